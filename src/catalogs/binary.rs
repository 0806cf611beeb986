//! Binary catalog stream.
//!
//! A file is the 4-byte magic `DSOB`, a big-endian `u32` format version,
//! then records back to back until end of file. Every number is big-endian;
//! strings are a `u32` byte length followed by UTF-8 bytes.
//!
//! Record layout:
//!
//! | field | type |
//! |---|---|
//! | internal id | u32 |
//! | RA, Dec (rad) | f64, f64 |
//! | B, V magnitude | f32, f32 |
//! | type code | u32 |
//! | morphological type | string |
//! | major, minor axis (deg) | f32, f32 |
//! | orientation (deg) | i32 |
//! | z, z error, parallax, parallax error, distance, distance error | 6 × f32 |
//! | NGC IC M C B Sh2 VdB RCW LDN LBN Cr Mel PGC UGC | 14 × u32 |
//! | Cederblad | string |

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::catalogs::{CatalogNumberSet, NUMERIC_CATALOG_COUNT};
use crate::error::{DecodeError, LoadError};
use crate::object::{ObjectRecord, TypeTag};

pub const MAGIC: [u8; 4] = *b"DSOB";
pub const FORMAT_VERSION: u32 = 1;

/// Longest string field accepted when decoding.
pub const MAX_STRING_LEN: u32 = 64 * 1024;

pub fn write_header<W: Write>(writer: &mut W) -> io::Result<()> {
    writer.write_all(&MAGIC)?;
    writer.write_u32::<BigEndian>(FORMAT_VERSION)
}

/// Validate the stream header and return its version.
pub fn read_header<R: Read>(reader: &mut R) -> Result<u32, DecodeError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(DecodeError::BadMagic { actual: magic });
    }
    let version = reader.read_u32::<BigEndian>()?;
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    Ok(version)
}

pub fn encode_record<W: Write>(record: &ObjectRecord, writer: &mut W) -> io::Result<()> {
    writer.write_u32::<BigEndian>(record.internal_id)?;
    writer.write_f64::<BigEndian>(record.ra_rad())?;
    writer.write_f64::<BigEndian>(record.dec_rad())?;
    writer.write_f32::<BigEndian>(record.magnitude_b)?;
    writer.write_f32::<BigEndian>(record.magnitude_v)?;
    writer.write_u32::<BigEndian>(record.object_type.code())?;
    write_string(writer, &record.morphological_type)?;
    writer.write_f32::<BigEndian>(record.major_axis_deg)?;
    writer.write_f32::<BigEndian>(record.minor_axis_deg)?;
    writer.write_i32::<BigEndian>(record.orientation_deg)?;
    for value in [
        record.redshift,
        record.redshift_error,
        record.parallax_mas,
        record.parallax_error,
        record.distance,
        record.distance_error,
    ] {
        writer.write_f32::<BigEndian>(value)?;
    }
    for &number in record.catalog_numbers.raw_numbers() {
        writer.write_u32::<BigEndian>(number)?;
    }
    write_string(writer, record.catalog_numbers.ced().unwrap_or(""))
}

/// Decode one record. Running out of input anywhere, including before the
/// first byte, is [`DecodeError::Truncated`]; use [`decode_next`] to detect
/// a clean end of stream.
pub fn decode_record<R: Read>(reader: &mut R) -> Result<ObjectRecord, DecodeError> {
    let internal_id = reader.read_u32::<BigEndian>()?;
    decode_body(internal_id, reader)
}

/// Decode the next record, or `None` at a clean end of stream.
pub fn decode_next<R: Read>(reader: &mut R) -> Result<Option<ObjectRecord>, DecodeError> {
    let mut id_bytes = [0u8; 4];
    let mut filled = 0;
    while filled < id_bytes.len() {
        match reader.read(&mut id_bytes[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    match filled {
        0 => Ok(None),
        4 => decode_body(u32::from_be_bytes(id_bytes), reader).map(Some),
        _ => Err(DecodeError::Truncated),
    }
}

fn decode_body<R: Read>(internal_id: u32, reader: &mut R) -> Result<ObjectRecord, DecodeError> {
    let ra = reader.read_f64::<BigEndian>()?;
    let dec = reader.read_f64::<BigEndian>()?;
    if !ra.is_finite() || !dec.is_finite() {
        return Err(DecodeError::Corrupt(format!(
            "non-finite position for object {internal_id}"
        )));
    }
    let mut record = ObjectRecord::new(internal_id, ra, dec);
    record.magnitude_b = reader.read_f32::<BigEndian>()?;
    record.magnitude_v = reader.read_f32::<BigEndian>()?;
    record.object_type = TypeTag::from_code(reader.read_u32::<BigEndian>()?);
    record.morphological_type = read_string(reader)?;
    record.major_axis_deg = reader.read_f32::<BigEndian>()?;
    record.minor_axis_deg = reader.read_f32::<BigEndian>()?;
    record.orientation_deg = reader.read_i32::<BigEndian>()?;
    record.redshift = reader.read_f32::<BigEndian>()?;
    record.redshift_error = reader.read_f32::<BigEndian>()?;
    record.parallax_mas = reader.read_f32::<BigEndian>()?;
    record.parallax_error = reader.read_f32::<BigEndian>()?;
    record.distance = reader.read_f32::<BigEndian>()?;
    record.distance_error = reader.read_f32::<BigEndian>()?;

    let mut numbers = [0u32; NUMERIC_CATALOG_COUNT];
    reader.read_u32_into::<BigEndian>(&mut numbers)?;
    let ced = read_string(reader)?;
    record.catalog_numbers = CatalogNumberSet::from_raw(numbers, ced);
    Ok(record)
}

fn write_string<W: Write>(writer: &mut W, s: &str) -> io::Result<()> {
    let len = u32::try_from(s.len())
        .ok()
        .filter(|&n| n <= MAX_STRING_LEN)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("string field of {} bytes is too long", s.len()),
            )
        })?;
    writer.write_u32::<BigEndian>(len)?;
    writer.write_all(s.as_bytes())
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, DecodeError> {
    let len = reader.read_u32::<BigEndian>()?;
    if len > MAX_STRING_LEN {
        return Err(DecodeError::Corrupt(format!("string length {len} exceeds limit")));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| DecodeError::InvalidUtf8)
}

/// Write a header followed by `records`. Returns the record count.
pub fn write_catalog<'a, I, W>(records: I, writer: &mut W) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a ObjectRecord>,
    W: Write,
{
    write_header(writer)?;
    let mut count = 0;
    for record in records {
        encode_record(record, writer)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Streaming reader over a validated binary catalog.
///
/// Yields records until a clean end of stream. The first error is yielded
/// once and ends iteration.
#[derive(Debug)]
pub struct BinaryCatalogReader<R: Read> {
    reader: R,
    version: u32,
    finished: bool,
}

impl<R: Read> BinaryCatalogReader<R> {
    /// Check the header and position the reader on the first record.
    pub fn new(mut reader: R) -> Result<Self, DecodeError> {
        let version = read_header(&mut reader)?;
        Ok(Self {
            reader,
            version,
            finished: false,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }
}

impl BinaryCatalogReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|e| LoadError::unavailable(path, e))?;
        Ok(Self::new(BufReader::new(file))?)
    }
}

impl<R: Read> Iterator for BinaryCatalogReader<R> {
    type Item = Result<ObjectRecord, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match decode_next(&mut self.reader) {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::Catalog;
    use std::io::Cursor;

    fn andromeda() -> ObjectRecord {
        let mut rec = ObjectRecord::new(40_001, 0.186_495_3, 0.720_064_1);
        rec.magnitude_b = 4.36;
        rec.magnitude_v = 3.44;
        rec.object_type = TypeTag::Galaxy;
        rec.morphological_type = "SA(s)b".into();
        rec.major_axis_deg = 3.167;
        rec.minor_axis_deg = 1.0;
        rec.orientation_deg = 35;
        rec.redshift = -0.001;
        rec.distance = 0.78;
        rec.catalog_numbers = CatalogNumberSet::new()
            .with(Catalog::Ngc, 224)
            .with(Catalog::M, 31)
            .with(Catalog::Pgc, 2557)
            .with(Catalog::Ugc, 454);
        rec
    }

    #[test]
    fn record_round_trip_is_exact() {
        let mut ced = ObjectRecord::new(7, 5.5, -0.3);
        ced.object_type = TypeTag::ReflectionNebula;
        ced.catalog_numbers = CatalogNumberSet::new().with_ced("55a");

        for rec in [andromeda(), ced, ObjectRecord::default()] {
            let mut buf = Vec::new();
            encode_record(&rec, &mut buf).unwrap();
            let decoded = decode_record(&mut Cursor::new(&buf)).unwrap();
            assert_eq!(decoded, rec);
        }
    }

    #[test]
    fn reader_stops_cleanly_at_eof() {
        let records = vec![andromeda(), ObjectRecord::new(2, 1.0, 0.5)];
        let mut buf = Vec::new();
        assert_eq!(write_catalog(&records, &mut buf).unwrap(), 2);

        let reader = BinaryCatalogReader::new(Cursor::new(buf)).unwrap();
        assert_eq!(reader.version(), FORMAT_VERSION);
        let decoded: Vec<ObjectRecord> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn truncated_record_is_reported() {
        let mut buf = Vec::new();
        write_catalog([&andromeda()], &mut buf).unwrap();
        for cut in [buf.len() - 1, 8 + 2, 8 + 20] {
            let mut reader = BinaryCatalogReader::new(Cursor::new(buf[..cut].to_vec())).unwrap();
            assert!(matches!(reader.next(), Some(Err(DecodeError::Truncated))));
            assert!(reader.next().is_none());
        }
    }

    #[test]
    fn header_is_validated() {
        let err = BinaryCatalogReader::new(Cursor::new(b"NOPE\0\0\0\x01".to_vec())).unwrap_err();
        assert!(matches!(err, DecodeError::BadMagic { actual } if &actual == b"NOPE"));

        let err = BinaryCatalogReader::new(Cursor::new(b"DSOB\0\0\0\x09".to_vec())).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedVersion(9)));

        let err = BinaryCatalogReader::new(Cursor::new(b"DS".to_vec())).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated));
    }

    #[test]
    fn bad_strings_are_rejected() {
        let mut buf = Vec::new();
        encode_record(&ObjectRecord::new(1, 0.0, 0.0), &mut buf).unwrap();
        // morphological type length sits right after id, ra, dec, mags and type
        let morph_len_at = 4 + 8 + 8 + 4 + 4 + 4;

        let mut oversized = buf.clone();
        oversized[morph_len_at..morph_len_at + 4].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            decode_record(&mut Cursor::new(oversized)),
            Err(DecodeError::Corrupt(_))
        ));

        let mut invalid = Vec::new();
        invalid.extend_from_slice(&buf[..morph_len_at]);
        invalid.extend_from_slice(&2u32.to_be_bytes());
        invalid.extend_from_slice(&[0xff, 0xfe]);
        invalid.extend_from_slice(&buf[morph_len_at + 4..]);
        assert!(matches!(
            decode_record(&mut Cursor::new(invalid)),
            Err(DecodeError::InvalidUtf8)
        ));
    }
}
