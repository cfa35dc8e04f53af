//! Minimal FITS reader for the primary image plane.
//!
//! Reads just enough of a FITS file to render a preview:
//! - the primary header (80-byte cards in 2880-byte blocks, up to `END`)
//! - `BITPIX`, `NAXIS`, `NAXISn`, `BZERO`, `BSCALE` and `BLANK`
//! - the first `NAXIS1 × NAXIS2` plane of the primary data unit
//!
//! Cubes (`NAXIS > 2`) contribute only their first plane. Extensions,
//! compressed tiles and random groups are not read.
//!
//! Pixel values are converted to physical values (`BZERO + BSCALE × raw`) as
//! `f32`. Integer pixels equal to `BLANK` become NaN. Data is big-endian.
//!
//! Zero external dependencies, pure Rust.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use thiserror::Error;

const BLOCK_SIZE: usize = 2880;
const CARD_SIZE: usize = 80;

#[derive(Error, Debug)]
pub enum FitsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a FITS file (missing SIMPLE keyword)")]
    NotFits,
    #[error("header ended before the END card")]
    MissingEnd,
    #[error("missing required keyword {0}")]
    MissingKeyword(String),
    #[error("invalid value for {keyword}: {value:?}")]
    InvalidValue { keyword: String, value: String },
    #[error("unsupported BITPIX {0}")]
    UnsupportedBitpix(i64),
    #[error("primary HDU is not an image (NAXIS = {0})")]
    NotAnImage(usize),
    #[error("image has an empty axis ({width}x{height})")]
    EmptyImage { width: usize, height: usize },
    #[error("image dimensions {width}x{height} are too large")]
    TooLarge { width: usize, height: usize },
    #[error("data truncated: expected {expected} bytes for the first plane")]
    Truncated { expected: usize },
}

/// First image plane of a FITS primary HDU.
///
/// `data` is row-major with `width` values per row. Row 0 is the first row
/// stored in the file, which FITS viewers draw at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct FitsPlane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

/// Keywords of the primary header needed to read the data unit.
#[derive(Debug, Clone, PartialEq)]
struct PrimaryHeader {
    bitpix: i64,
    axes: Vec<usize>,
    bzero: f64,
    bscale: f64,
    blank: Option<i64>,
}

/// Open a file and read the first plane of its primary HDU.
pub fn read_primary_plane_from_path(path: &Path) -> Result<FitsPlane, FitsError> {
    let file = File::open(path)?;
    read_primary_plane(BufReader::new(file))
}

/// Read the first plane of the primary HDU from any byte stream.
pub fn read_primary_plane(mut reader: impl Read) -> Result<FitsPlane, FitsError> {
    let header = read_header(&mut reader)?;

    let naxis = header.axes.len();
    if naxis < 2 {
        return Err(FitsError::NotAnImage(naxis));
    }
    let (width, height) = (header.axes[0], header.axes[1]);
    if width == 0 || height == 0 {
        return Err(FitsError::EmptyImage { width, height });
    }

    let bytes_per_pixel = bytes_per_pixel(header.bitpix)?;
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(bytes_per_pixel))
        .ok_or(FitsError::TooLarge { width, height })?;

    // The buffer grows with the bytes actually present, never with the
    // header's claimed size.
    let mut raw = Vec::new();
    reader.take(expected as u64).read_to_end(&mut raw)?;
    if raw.len() < expected {
        return Err(FitsError::Truncated { expected });
    }

    Ok(FitsPlane {
        width,
        height,
        data: convert_pixels(&header, &raw),
    })
}

fn bytes_per_pixel(bitpix: i64) -> Result<usize, FitsError> {
    match bitpix {
        8 => Ok(1),
        16 => Ok(2),
        32 | -32 => Ok(4),
        64 | -64 => Ok(8),
        other => Err(FitsError::UnsupportedBitpix(other)),
    }
}

// ---------------------------------------------------------------------------
// Header parsing
// ---------------------------------------------------------------------------

fn read_header(reader: &mut impl Read) -> Result<PrimaryHeader, FitsError> {
    let mut block = [0u8; BLOCK_SIZE];
    let mut first_card = true;
    let mut bitpix = None;
    let mut naxis = None;
    let mut axis_lengths: Vec<(usize, usize)> = Vec::new();
    let mut bzero = 0.0;
    let mut bscale = 1.0;
    let mut blank = None;

    loop {
        reader.read_exact(&mut block).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof if first_card => FitsError::NotFits,
            ErrorKind::UnexpectedEof => FitsError::MissingEnd,
            _ => FitsError::Io(e),
        })?;

        for raw_card in block.chunks_exact(CARD_SIZE) {
            let text = String::from_utf8_lossy(raw_card);
            let card: &str = &text;
            let keyword = card.get(..8).unwrap_or(card).trim_end();

            if first_card {
                if keyword != "SIMPLE" || card_value(card) != Some("T") {
                    return Err(FitsError::NotFits);
                }
                first_card = false;
                continue;
            }

            match keyword {
                "END" => {
                    let naxis = naxis.ok_or_else(|| missing("NAXIS"))?;
                    return Ok(PrimaryHeader {
                        bitpix: bitpix.ok_or_else(|| missing("BITPIX"))?,
                        axes: collect_axes(naxis, &axis_lengths)?,
                        bzero,
                        bscale,
                        blank,
                    });
                }
                "BITPIX" => bitpix = Some(int_value(keyword, card)?),
                "NAXIS" => naxis = Some(usize_value(keyword, card)?),
                "BZERO" => bzero = float_value(keyword, card)?,
                "BSCALE" => bscale = float_value(keyword, card)?,
                "BLANK" => blank = Some(int_value(keyword, card)?),
                k if k.starts_with("NAXIS") => {
                    if let Ok(index) = k["NAXIS".len()..].parse::<usize>() {
                        axis_lengths.push((index, usize_value(keyword, card)?));
                    }
                }
                _ => {}
            }
        }
    }
}

fn missing(keyword: &str) -> FitsError {
    FitsError::MissingKeyword(keyword.to_string())
}

fn collect_axes(naxis: usize, lengths: &[(usize, usize)]) -> Result<Vec<usize>, FitsError> {
    (1..=naxis)
        .map(|i| {
            lengths
                .iter()
                .find(|(index, _)| *index == i)
                .map(|(_, len)| *len)
                .ok_or_else(|| missing(&format!("NAXIS{i}")))
        })
        .collect()
}

/// Value field of a card: columns 11-80 after `= `, with any `/ comment` removed.
///
/// String values are not needed here, so quotes are not interpreted.
fn card_value(card: &str) -> Option<&str> {
    if card.get(8..10) != Some("= ") {
        return None;
    }
    let value = card.get(10..)?;
    Some(value.split('/').next().unwrap_or(value).trim())
}

fn invalid(keyword: &str, card: &str) -> FitsError {
    FitsError::InvalidValue {
        keyword: keyword.to_string(),
        value: card_value(card).unwrap_or(card).to_string(),
    }
}

fn int_value(keyword: &str, card: &str) -> Result<i64, FitsError> {
    card_value(card)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| invalid(keyword, card))
}

fn usize_value(keyword: &str, card: &str) -> Result<usize, FitsError> {
    card_value(card)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| invalid(keyword, card))
}

/// Floats may use a Fortran `D` exponent (`1.0D+03`).
fn float_value(keyword: &str, card: &str) -> Result<f64, FitsError> {
    card_value(card)
        .and_then(|v| v.replace(['D', 'd'], "E").parse().ok())
        .ok_or_else(|| invalid(keyword, card))
}

// ---------------------------------------------------------------------------
// Pixel conversion
// ---------------------------------------------------------------------------

fn convert_pixels(header: &PrimaryHeader, raw: &[u8]) -> Vec<f32> {
    let physical = |v: f64| (header.bzero + header.bscale * v) as f32;
    let integer = |v: i64| {
        if header.blank == Some(v) {
            f32::NAN
        } else {
            physical(v as f64)
        }
    };

    match header.bitpix {
        8 => raw.iter().map(|&b| integer(b as i64)).collect(),
        16 => raw
            .chunks_exact(2)
            .map(|c| integer(i16::from_be_bytes([c[0], c[1]]) as i64))
            .collect(),
        32 => raw
            .chunks_exact(4)
            .map(|c| integer(i32::from_be_bytes([c[0], c[1], c[2], c[3]]) as i64))
            .collect(),
        64 => raw
            .chunks_exact(8)
            .map(|c| integer(i64::from_be_bytes(be8(c))))
            .collect(),
        -32 => raw
            .chunks_exact(4)
            .map(|c| physical(f32::from_be_bytes([c[0], c[1], c[2], c[3]]) as f64))
            .collect(),
        // BITPIX is validated before conversion, so this arm is -64.
        _ => raw
            .chunks_exact(8)
            .map(|c| physical(f64::from_be_bytes(be8(c))))
            .collect(),
    }
}

fn be8(c: &[u8]) -> [u8; 8] {
    [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]
}
