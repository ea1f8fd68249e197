//! Known section names of the bundled specification document.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! spec_sections {
    ($($variant:ident => $heading:literal,)+) => {
        /// A section heading of the bundled specification.
        ///
        /// Values serialize to the exact heading text, which is what section
        /// lookup compares against.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
        )]
        pub enum SpecSection {
            $(
                #[serde(rename = $heading)]
                $variant,
            )+
        }

        impl SpecSection {
            /// Every section, in document order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Heading text as it appears in the document.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $heading,)+
                }
            }
        }
    };
}

spec_sections! {
    Overview => "Overview",
    Architecture => "Architecture",
    BaseProtocol => "Base Protocol",
    Messages => "Messages",
    Lifecycle => "Lifecycle",
    Transports => "Transports",
    Authorization => "Authorization",
    Utilities => "Utilities",
    ServerFeatures => "Server Features",
    Prompts => "Prompts",
    Resources => "Resources",
    Tools => "Tools",
    ClientFeatures => "Client Features",
    Roots => "Roots",
    Sampling => "Sampling",
    Elicitation => "Elicitation",
    Security => "Security and Trust & Safety",
}

impl SpecSection {
    /// Parse exact heading text.
    #[must_use]
    pub fn from_heading(heading: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == heading)
    }
}

impl fmt::Display for SpecSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
