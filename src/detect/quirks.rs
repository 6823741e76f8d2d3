use serde::{Deserialize, Serialize};

use crate::detect::{
    error::{DetectError, invalid_request},
    ports::QuirkResolverPort,
    types::{BackendSelection, IdentityDescriptor, IdentityField, PciId},
};

const PCI_VENDOR_TRIDENT: u16 = 0x1023;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: IdentityField,
    pub value: String,
    /// Require equality instead of substring containment.
    #[serde(default)]
    pub exact: bool,
}

impl FieldMatch {
    pub fn matches(&self, identity: &IdentityDescriptor) -> bool {
        let actual = identity.field(self.field);
        if actual.is_empty() {
            return false;
        }
        if self.exact {
            actual == self.value
        } else {
            actual.contains(self.value.as_str())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuirkRule {
    pub ident: String,
    pub matches: Vec<FieldMatch>,
    #[serde(default)]
    pub requires_pci: Option<PciId>,
    pub outcome: BackendSelection,
}

impl QuirkRule {
    pub fn applies_to(&self, identity: &IdentityDescriptor) -> bool {
        self.matches.iter().all(|matcher| matcher.matches(identity))
            && self
                .requires_pci
                .is_none_or(|pci| identity.has_pci_device(pci))
    }

    fn validate(&self) -> Result<(), DetectError> {
        if self.matches.is_empty() {
            return Err(invalid_request(format!(
                "quirk '{}' has no identity matches",
                self.ident
            )));
        }
        if self.matches.iter().any(|matcher| matcher.value.is_empty()) {
            return Err(invalid_request(format!(
                "quirk '{}' matches an empty identity value",
                self.ident
            )));
        }
        if !self.outcome.is_defined() {
            return Err(invalid_request(format!(
                "quirk '{}' must force a defined backend",
                self.ident
            )));
        }
        Ok(())
    }
}

/// Ordered quirk list. Identity data is not disjoint, so several rules can
/// match one machine; only the first in list order applies.
#[derive(Debug, Clone, Default)]
pub struct QuirkTable {
    rules: Vec<QuirkRule>,
}

impl QuirkTable {
    pub fn new(rules: Vec<QuirkRule>) -> Result<Self, DetectError> {
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { rules })
    }

    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_QUIRKS.iter().map(BuiltinQuirk::to_rule).collect(),
        }
    }

    /// Places `extra` ahead of the current rules so they take precedence.
    pub fn with_extra_rules(self, extra: Vec<QuirkRule>) -> Result<Self, DetectError> {
        let mut rules = extra;
        rules.extend(self.rules);
        Self::new(rules)
    }

    pub fn rules(&self) -> &[QuirkRule] {
        &self.rules
    }

    pub fn first_match(&self, identity: &IdentityDescriptor) -> Option<&QuirkRule> {
        self.rules.iter().find(|rule| rule.applies_to(identity))
    }
}

impl QuirkResolverPort for QuirkTable {
    fn forced_selection(&self, identity: &IdentityDescriptor) -> BackendSelection {
        match self.first_match(identity) {
            Some(rule) => {
                tracing::debug!(
                    target: "detect",
                    ident = %rule.ident,
                    outcome = %rule.outcome,
                    "quirk_matched"
                );
                rule.outcome
            }
            None => BackendSelection::Undefined,
        }
    }
}

struct BuiltinQuirk {
    ident: &'static str,
    matches: &'static [(IdentityField, &'static str, bool)],
    requires_pci: Option<PciId>,
    outcome: BackendSelection,
}

impl BuiltinQuirk {
    fn to_rule(&self) -> QuirkRule {
        QuirkRule {
            ident: self.ident.to_string(),
            matches: self
                .matches
                .iter()
                .map(|(field, value, exact)| FieldMatch {
                    field: *field,
                    value: (*value).to_string(),
                    exact: *exact,
                })
                .collect(),
            requires_pci: self.requires_pci,
            outcome: self.outcome,
        }
    }
}

const fn quirk(
    ident: &'static str,
    matches: &'static [(IdentityField, &'static str, bool)],
    outcome: BackendSelection,
) -> BuiltinQuirk {
    BuiltinQuirk {
        ident,
        matches,
        requires_pci: None,
        outcome,
    }
}

use BackendSelection::{Legacy, Native, Vendor};
use IdentityField::{BiosVersion, BoardName, ProductName, ProductVersion, SysVendor};

static BUILTIN_QUIRKS: &[BuiltinQuirk] = &[
    // BIOS sets a flag when the generic interface is used that breaks every
    // brightness path until reboot.
    quirk(
        "Samsung X360",
        &[
            (SysVendor, "SAMSUNG ELECTRONICS CO., LTD.", false),
            (ProductName, "X360", false),
            (BoardName, "X360", false),
        ],
        Vendor,
    ),
    quirk(
        "Asus UL30VT",
        &[
            (SysVendor, "ASUSTeK Computer Inc.", false),
            (ProductName, "UL30VT", false),
        ],
        Vendor,
    ),
    quirk(
        "Asus UL30A",
        &[
            (SysVendor, "ASUSTeK Computer Inc.", false),
            (ProductName, "UL30A", false),
        ],
        Vendor,
    ),
    quirk(
        "GIGABYTE GB-BXBT-2807",
        &[(SysVendor, "GIGABYTE", false), (ProductName, "GB-BXBT-2807", false)],
        Vendor,
    ),
    quirk(
        "Sony VPCEH3U1E",
        &[
            (SysVendor, "Sony Corporation", false),
            (ProductName, "VPCEH3U1E", false),
        ],
        Vendor,
    ),
    quirk(
        "Dell Vostro 15 3535",
        &[(SysVendor, "Dell Inc.", false), (ProductName, "Vostro 15 3535", false)],
        Native,
    ),
    // Identity strings are generic; the Trident CyberBlade XP4m32 confirms
    // the model.
    BuiltinQuirk {
        ident: "Toshiba Portege R100",
        matches: &[
            (SysVendor, "TOSHIBA", false),
            (ProductName, "Portable PC", false),
            (ProductVersion, "Version 1.0", false),
            (BoardName, "Portable PC", false),
        ],
        requires_pci: Some(PciId {
            vendor: PCI_VENDOR_TRIDENT,
            device: 0x2100,
        }),
        outcome: Vendor,
    },
    // All-in-ones whose GPU driver never registers a panel backlight.
    quirk(
        "Apple iMac14,1",
        &[(SysVendor, "Apple Inc.", false), (ProductName, "iMac14,1", false)],
        Legacy,
    ),
    quirk(
        "Apple iMac14,2",
        &[(SysVendor, "Apple Inc.", false), (ProductName, "iMac14,2", false)],
        Legacy,
    ),
    quirk(
        "ThinkPad W530",
        &[(SysVendor, "LENOVO", false), (ProductVersion, "ThinkPad W530", false)],
        Legacy,
    ),
    // Native control stops working when userspace ignores brightness keys.
    quirk(
        "ThinkPad T420",
        &[(SysVendor, "LENOVO", false), (ProductVersion, "ThinkPad T420", false)],
        Legacy,
    ),
    quirk(
        "ThinkPad T520",
        &[(SysVendor, "LENOVO", false), (ProductVersion, "ThinkPad T520", false)],
        Legacy,
    ),
    quirk(
        "ThinkPad X201s",
        &[(SysVendor, "LENOVO", false), (ProductVersion, "ThinkPad X201s", false)],
        Legacy,
    ),
    quirk(
        "ThinkPad X201T",
        &[(SysVendor, "LENOVO", false), (ProductVersion, "ThinkPad X201T", false)],
        Legacy,
    ),
    quirk(
        "HP ENVY 15 Notebook",
        &[
            (SysVendor, "Hewlett-Packard", false),
            (ProductName, "HP ENVY 15 Notebook PC", false),
        ],
        Legacy,
    ),
    quirk(
        "Dell XPS L421X",
        &[(SysVendor, "Dell Inc.", false), (ProductName, "XPS L421X", false)],
        Legacy,
    ),
    quirk(
        "Lenovo IdeaPad S405",
        &[(SysVendor, "LENOVO", false), (BoardName, "Lenovo IdeaPad S405", false)],
        Native,
    ),
    quirk(
        "Lenovo IdeaPad Z470",
        &[(SysVendor, "LENOVO", false), (ProductVersion, "IdeaPad Z470", false)],
        Native,
    ),
    quirk(
        "Apple MacBook Pro 12,1",
        &[
            (SysVendor, "Apple Inc.", false),
            (ProductName, "MacBookPro12,1", false),
        ],
        Native,
    ),
    quirk(
        "Dell Precision 7510",
        &[(SysVendor, "Dell Inc.", false), (ProductName, "Precision 7510", false)],
        Native,
    ),
    quirk(
        "Acer Aspire 5738z",
        &[
            (SysVendor, "Acer", false),
            (ProductName, "Aspire 5738", false),
            (BoardName, "JV50", false),
        ],
        Native,
    ),
    quirk(
        "Asus GA401",
        &[
            (SysVendor, "ASUSTeK COMPUTER INC.", false),
            (ProductName, "GA401", false),
        ],
        Native,
    ),
    // Unregistering the legacy device during boot leaves a dangling firmware
    // brightness request on these boards.
    quirk("Clevo NL5xRU", &[(BoardName, "NL5xRU", false)], Native),
    quirk(
        "Clevo NL5xRU",
        &[(SysVendor, "TUXEDO", false), (BoardName, "AURA1501", false)],
        Native,
    ),
    quirk("Clevo NL5xNU", &[(BoardName, "NL5xNU", false)], Native),
    quirk("TongFang PF5PU1G", &[(BoardName, "PF5PU1G", false)], Native),
    quirk("TongFang PF4NU1F", &[(BoardName, "PF4NU1F", false)], Native),
    quirk("TongFang PF5LUXG", &[(BoardName, "PF5LUXG", false)], Native),
    // Tablets driving the panel through an external backlight controller;
    // neither the legacy nor the native path works.
    quirk(
        "Lenovo Yoga Book X90F",
        &[
            (SysVendor, "Intel Corporation", true),
            (ProductName, "CHERRYVIEW D1 PLATFORM", true),
            (ProductVersion, "YETI-11", true),
        ],
        Vendor,
    ),
    quirk(
        "Lenovo Yoga Tablet 2 830F/1050F",
        &[
            (SysVendor, "Intel Corp.", false),
            (ProductName, "VALLEYVIEW C0 PLATFORM", false),
            (BoardName, "BYT-T FFD8", false),
            (BiosVersion, "BLADE_21", false),
        ],
        Vendor,
    ),
    quirk(
        "Xiaomi Mi Pad 2",
        &[(SysVendor, "Xiaomi Inc", false), (ProductName, "Mipad2", false)],
        Vendor,
    ),
];
