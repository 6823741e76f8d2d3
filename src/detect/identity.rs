use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::detect::{
    error::{DetectError, identity_unavailable},
    ports::IdentitySourcePort,
    types::{IdentityDescriptor, IdentityField, PciId},
};

pub const DEFAULT_DMI_DIR: &str = "/sys/class/dmi/id";
pub const DEFAULT_PCI_DIR: &str = "/sys/bus/pci/devices";

/// Reads the identity descriptor from a `/sys/class/dmi/id` style directory
/// and, optionally, the PCI device list from a `/sys/bus/pci/devices` style
/// directory. Missing identity files read as empty fields.
#[derive(Debug, Clone)]
pub struct SysfsIdentitySource {
    dmi_dir: PathBuf,
    pci_dir: Option<PathBuf>,
}

impl SysfsIdentitySource {
    pub fn new(dmi_dir: impl Into<PathBuf>, pci_dir: Option<PathBuf>) -> Self {
        Self {
            dmi_dir: dmi_dir.into(),
            pci_dir,
        }
    }
}

impl Default for SysfsIdentitySource {
    fn default() -> Self {
        Self::new(DEFAULT_DMI_DIR, Some(PathBuf::from(DEFAULT_PCI_DIR)))
    }
}

impl IdentitySourcePort for SysfsIdentitySource {
    fn read_identity(&self) -> Result<IdentityDescriptor, DetectError> {
        if !self.dmi_dir.is_dir() {
            return Err(identity_unavailable(format!(
                "identity directory {} does not exist",
                self.dmi_dir.display()
            )));
        }

        let mut identity = IdentityDescriptor::default();
        for field in IdentityField::ALL {
            let path = self.dmi_dir.join(field.sysfs_name());
            let value = read_trimmed(&path).map_err(|err| {
                identity_unavailable(format!("failed to read {}: {err}", path.display()))
            })?;
            identity.set_field(field, value.unwrap_or_default());
        }

        if let Some(pci_dir) = &self.pci_dir {
            identity.pci_devices = read_pci_devices(pci_dir);
        }

        Ok(identity)
    }
}

/// Returns `Ok(None)` for a missing file; firmware leaves some fields out.
/// Identity strings are raw bytes, so invalid UTF-8 is replaced, not rejected.
fn read_trimmed(path: &Path) -> io::Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).trim().to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

fn read_pci_devices(pci_dir: &Path) -> Vec<PciId> {
    let entries = match fs::read_dir(pci_dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(
                target: "detect",
                dir = %pci_dir.display(),
                error = %err,
                "pci_scan_failed"
            );
            return Vec::new();
        }
    };

    let mut devices: Vec<PciId> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let device_dir = entry.path();
            let vendor = read_hex_id(&device_dir.join("vendor"))?;
            let device = read_hex_id(&device_dir.join("device"))?;
            Some(PciId { vendor, device })
        })
        .collect();
    devices.sort();
    devices.dedup();
    devices
}

fn read_hex_id(path: &Path) -> Option<u16> {
    let raw = read_trimmed(path).ok()??;
    parse_hex_id(&raw)
}

fn parse_hex_id(raw: &str) -> Option<u16> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u16::from_str_radix(digits, 16).ok()
}
