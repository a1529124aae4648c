//! JSON file record store

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use bmb_core::errors::DomainResult;
use bmb_core::repositories::{OtpRecordMap, OtpStore};

use crate::InfrastructureError;

/// Stores the record set as one JSON object on disk.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileOtpStore {
    path: PathBuf,
}

impl JsonFileOtpStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "otp_records.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read(&self) -> Result<OtpRecordMap, InfrastructureError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No OTP record file yet, starting empty");
                return Ok(OtpRecordMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(OtpRecordMap::new());
        }

        Ok(serde_json::from_slice(&raw)?)
    }

    fn write(&self, records: &OtpRecordMap) -> Result<(), InfrastructureError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        {
            let mut file = fs::File::create(&temp)?;
            serde_json::to_writer_pretty(&mut file, records)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), records = records.len(), "OTP records written");
        Ok(())
    }
}

impl OtpStore for JsonFileOtpStore {
    fn load_all(&self) -> DomainResult<OtpRecordMap> {
        Ok(self.read()?)
    }

    fn save_all(&self, records: &OtpRecordMap) -> DomainResult<()> {
        Ok(self.write(records)?)
    }
}
