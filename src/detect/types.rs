use std::fmt;

use serde::{Deserialize, Serialize};

/// Which control path owns display brightness.
///
/// `Undefined` means "no forced choice" and is never the result of a
/// resolution, only an input to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendSelection {
    #[default]
    Undefined,
    None,
    Vendor,
    #[serde(rename = "video")]
    Legacy,
    Native,
    #[serde(rename = "nvidia_wmi_ec")]
    NativeEcSourced,
}

impl BackendSelection {
    /// Maps the boot override string onto a selection. Matching is exact;
    /// anything unrecognized leaves the choice undefined.
    pub fn from_override(raw: &str) -> Self {
        match raw {
            "vendor" => Self::Vendor,
            "video" => Self::Legacy,
            "native" => Self::Native,
            "nvidia_wmi_ec" => Self::NativeEcSourced,
            "none" => Self::None,
            _ => Self::Undefined,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::None => "none",
            Self::Vendor => "vendor",
            Self::Legacy => "video",
            Self::Native => "native",
            Self::NativeEcSourced => "nvidia_wmi_ec",
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, Self::Undefined)
    }
}

impl fmt::Display for BackendSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub selection: BackendSelection,
    pub auto_detected: bool,
}

impl Resolution {
    pub fn forced(selection: BackendSelection) -> Self {
        Self {
            selection,
            auto_detected: false,
        }
    }

    pub fn detected(selection: BackendSelection) -> Self {
        Self {
            selection,
            auto_detected: true,
        }
    }
}

/// Static facts reported by the capability probe.
///
/// `legacy_video` is `None` when the walker could not tell, which the
/// cascade treats the same as "absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilityFacts {
    #[serde(default)]
    pub legacy_video: Option<bool>,
    #[serde(default)]
    pub ec_sourced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlatformFacts {
    /// Firmware tables were written against the Windows 8 (or newer) OSI.
    #[serde(default)]
    pub windows8_firmware: bool,
    /// A ChromeOS embedded controller is present.
    #[serde(default)]
    pub chrome_ec_present: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    SysVendor,
    ProductName,
    ProductVersion,
    BoardName,
    BiosVersion,
}

impl IdentityField {
    pub const ALL: [IdentityField; 5] = [
        IdentityField::SysVendor,
        IdentityField::ProductName,
        IdentityField::ProductVersion,
        IdentityField::BoardName,
        IdentityField::BiosVersion,
    ];

    /// File name of the field under a `/sys/class/dmi/id` style directory.
    pub fn sysfs_name(&self) -> &'static str {
        match self {
            Self::SysVendor => "sys_vendor",
            Self::ProductName => "product_name",
            Self::ProductVersion => "product_version",
            Self::BoardName => "board_name",
            Self::BiosVersion => "bios_version",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PciId {
    pub vendor: u16,
    pub device: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentityDescriptor {
    #[serde(default)]
    pub sys_vendor: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_version: String,
    #[serde(default)]
    pub board_name: String,
    #[serde(default)]
    pub bios_version: String,
    #[serde(default)]
    pub pci_devices: Vec<PciId>,
}

impl IdentityDescriptor {
    pub fn field(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::SysVendor => &self.sys_vendor,
            IdentityField::ProductName => &self.product_name,
            IdentityField::ProductVersion => &self.product_version,
            IdentityField::BoardName => &self.board_name,
            IdentityField::BiosVersion => &self.bios_version,
        }
    }

    pub fn set_field(&mut self, field: IdentityField, value: impl Into<String>) {
        let slot = match field {
            IdentityField::SysVendor => &mut self.sys_vendor,
            IdentityField::ProductName => &mut self.product_name,
            IdentityField::ProductVersion => &mut self.product_version,
            IdentityField::BoardName => &mut self.board_name,
            IdentityField::BiosVersion => &mut self.bios_version,
        };
        *slot = value.into();
    }

    pub fn has_pci_device(&self, id: PciId) -> bool {
        self.pci_devices.contains(&id)
    }
}

/// Side effects requested by a state transition. The engine executes them
/// after the state lock is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectEffect {
    UnregisterLegacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedTransition {
    pub resolution: Resolution,
    pub effects: Vec<DetectEffect>,
}
