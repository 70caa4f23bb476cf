//! # Region Snapshots
//!
//! Binary save/load of every region's multiplier table, driven by the
//! world-save cycle of the host server.
//!
//! ## Format
//!
//! ```text
//! [4 bytes: magic "RGNS"]
//! [4 bytes: snapshot version]
//! [4 bytes: record count]
//!
//! Record framing:
//! [4 bytes: payload length]
//! [N bytes: payload]
//! [4 bytes: CRC32 of payload]
//!
//! Payload (version 0):
//! [4 bytes: record version]
//! [string: name]
//! [16 bytes: bounds x, y, width, height (i32)]
//! [8 bytes: local rate (f64)]
//! [1 byte: category present] [string: category]
//! [4 bytes: override count]
//! count x [4 bytes: category id] [8 bytes: multiplier (f64)]
//!
//! string = [4 bytes: byte length] [UTF-8 bytes]
//! ```
//!
//! All integers are little-endian. Overrides are written sorted by category
//! id but read back order-independently. An override whose category id is
//! unknown to this build is dropped with a warning; the rest of the reload
//! continues.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{EconomyError, EconomyResult};
use crate::profile::{RegionBounds, RegionProfile};
use crate::resource::ResourceCategory;

/// Magic bytes identifying a region snapshot.
const SNAPSHOT_MAGIC: &[u8; 4] = b"RGNS";

/// Current snapshot container version.
const SNAPSHOT_VERSION: u32 = 1;

/// Current record payload version.
const RECORD_VERSION: u32 = 0;

/// Persisted shape of one region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionRecord {
    /// Region name as entered.
    pub name: String,
    /// Opaque bounds.
    pub bounds: RegionBounds,
    /// Local rate.
    pub local_rate: f64,
    /// Category label.
    pub category: Option<String>,
    /// Per-category overrides.
    pub resource_rates: Vec<(ResourceCategory, f64)>,
}

impl RegionRecord {
    /// Captures a profile.
    #[must_use]
    pub fn from_profile(profile: &RegionProfile) -> Self {
        Self {
            name: profile.name().to_string(),
            bounds: profile.bounds(),
            local_rate: profile.local_rate(),
            category: profile.category().map(str::to_string),
            resource_rates: profile.resource_overrides(),
        }
    }

    /// Rebuilds the profile. Later duplicates of a category win.
    #[must_use]
    pub fn into_profile(self) -> RegionProfile {
        let mut profile = RegionProfile::new(self.name)
            .with_local_rate(self.local_rate)
            .with_bounds(self.bounds);
        profile.set_category(self.category);
        for (resource, multiplier) in self.resource_rates {
            profile.set_resource_multiplier(resource, multiplier);
        }
        profile
    }

    /// Serializes the record payload.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + self.name.len() + self.resource_rates.len() * 12);

        buf.extend_from_slice(&RECORD_VERSION.to_le_bytes());
        write_string(&mut buf, &self.name);
        buf.extend_from_slice(&self.bounds.x.to_le_bytes());
        buf.extend_from_slice(&self.bounds.y.to_le_bytes());
        buf.extend_from_slice(&self.bounds.width.to_le_bytes());
        buf.extend_from_slice(&self.bounds.height.to_le_bytes());
        buf.extend_from_slice(&self.local_rate.to_le_bytes());
        match &self.category {
            Some(category) => {
                buf.push(1);
                write_string(&mut buf, category);
            }
            None => buf.push(0),
        }

        let mut rates = self.resource_rates.clone();
        rates.sort_by_key(|(resource, _)| *resource);
        buf.extend_from_slice(&len_u32(rates.len()).to_le_bytes());
        for (resource, multiplier) in rates {
            buf.extend_from_slice(&resource.id().to_le_bytes());
            buf.extend_from_slice(&multiplier.to_le_bytes());
        }

        buf
    }

    /// Deserializes a record payload.
    ///
    /// # Errors
    ///
    /// Returns an error for truncated payloads, invalid UTF-8 and unknown
    /// record versions. Unknown category ids are not errors.
    pub fn decode(data: &[u8]) -> EconomyResult<Self> {
        let mut reader = ByteReader::new(data);

        let version = reader.read_u32()?;
        if version != RECORD_VERSION {
            return Err(EconomyError::UnsupportedVersion(version));
        }

        let name = reader.read_string()?;
        let bounds = RegionBounds {
            x: reader.read_i32()?,
            y: reader.read_i32()?,
            width: reader.read_i32()?,
            height: reader.read_i32()?,
        };
        let local_rate = reader.read_f64()?;
        let category = match reader.read_u8()? {
            0 => None,
            _ => Some(reader.read_string()?),
        };

        let count = reader.read_u32()?;
        let mut resource_rates = Vec::new();
        for _ in 0..count {
            let id = reader.read_u32()?;
            let multiplier = reader.read_f64()?;
            match ResourceCategory::from_id(id) {
                Some(resource) => resource_rates.push((resource, multiplier)),
                None => tracing::warn!(
                    "Region '{}': dropping override for unknown resource category id {}",
                    name,
                    id
                ),
            }
        }

        Ok(Self {
            name,
            bounds,
            local_rate,
            category,
            resource_rates,
        })
    }
}

/// Serializes a full snapshot.
#[must_use]
pub fn encode_snapshot(records: &[RegionRecord]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(SNAPSHOT_MAGIC);
    buf.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    buf.extend_from_slice(&len_u32(records.len()).to_le_bytes());

    for record in records {
        let payload = record.encode();
        buf.extend_from_slice(&len_u32(payload.len()).to_le_bytes());
        buf.extend_from_slice(&payload);
        buf.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    }

    buf
}

/// Deserializes a full snapshot.
///
/// # Errors
///
/// Returns an error on bad magic, unsupported version, truncation or a CRC
/// mismatch in any record.
pub fn decode_snapshot(data: &[u8]) -> EconomyResult<Vec<RegionRecord>> {
    let mut reader = ByteReader::new(data);

    if reader.take(SNAPSHOT_MAGIC.len())? != SNAPSHOT_MAGIC {
        return Err(EconomyError::CorruptSnapshot("invalid magic".to_string()));
    }
    let version = reader.read_u32()?;
    if version != SNAPSHOT_VERSION {
        return Err(EconomyError::UnsupportedVersion(version));
    }

    let count = reader.read_u32()?;
    let mut records = Vec::new();
    for _ in 0..count {
        let len = reader.read_u32()? as usize;
        let payload = reader.take(len)?;
        let expected = reader.read_u32()?;
        let actual = crc32fast::hash(payload);
        if expected != actual {
            return Err(EconomyError::ChecksumMismatch { expected, actual });
        }
        records.push(RegionRecord::decode(payload)?);
    }

    if !reader.is_exhausted() {
        return Err(EconomyError::CorruptSnapshot("trailing bytes after last record".to_string()));
    }

    Ok(records)
}

/// Writes a snapshot file, replacing any existing one.
///
/// The bytes go to a sibling `.tmp` file that is synced and then renamed over
/// `path`, so a failed save leaves the previous snapshot intact.
///
/// # Errors
///
/// Returns [`EconomyError::Io`] if the file cannot be written.
pub fn save_snapshot(path: impl AsRef<Path>, records: &[RegionRecord]) -> EconomyResult<()> {
    let path = path.as_ref();
    let tmp_path = temp_path_for(path);

    let written = write_synced(&tmp_path, &encode_snapshot(records))
        .and_then(|()| std::fs::rename(&tmp_path, path));
    if let Err(e) = written {
        std::fs::remove_file(&tmp_path).ok();
        return Err(e.into());
    }

    tracing::info!("Saved {} regions to {}", records.len(), path.display());
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(bytes)?;
    file.flush()?;
    file.get_ref().sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Reads a snapshot file.
///
/// # Errors
///
/// Returns [`EconomyError::Io`] if the file cannot be read, or any
/// [`decode_snapshot`] error.
pub fn load_snapshot(path: impl AsRef<Path>) -> EconomyResult<Vec<RegionRecord>> {
    let path = path.as_ref();
    let mut data = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut data)?;

    let records = decode_snapshot(&data)?;
    tracing::info!("Loaded {} regions from {}", records.len(), path.display());
    Ok(records)
}

fn write_string(buf: &mut Vec<u8>, value: &str) {
    buf.extend_from_slice(&len_u32(value.len()).to_le_bytes());
    buf.extend_from_slice(value.as_bytes());
}

/// Lengths above `u32::MAX` cannot occur for region data.
fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Bounds-checked little-endian cursor.
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> EconomyResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                EconomyError::CorruptSnapshot(format!(
                    "truncated: need {len} bytes at offset {}, have {}",
                    self.pos,
                    self.data.len() - self.pos
                ))
            })?;
        let data = self.data;
        let bytes = &data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> EconomyResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn read_u8(&mut self) -> EconomyResult<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    fn read_u32(&mut self) -> EconomyResult<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    fn read_i32(&mut self) -> EconomyResult<i32> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    fn read_f64(&mut self) -> EconomyResult<f64> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    fn read_string(&mut self) -> EconomyResult<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| EconomyError::CorruptSnapshot(format!("invalid UTF-8 in string: {e}")))
    }

    const fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }
}
