use std::fmt::{self, Display, Formatter};

use super::types::Address;

/// Number of memory cells the CPU has.
pub const RAM_SIZE: u32 = 1024;

/// Load origin of a kernel image.  The cells below it are reserved
/// for the CPU's registers and buffers.
pub const KERNEL_START: Address = Address::new(41);

/// Load origin of a user image.
pub const USER_START: Address = Address::new(17);

/// Which kind of memory image is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMode {
    #[default]
    Kernel,
    User,
}

impl ImageMode {
    /// The address of the first instruction of the image.
    #[must_use]
    pub fn origin(&self) -> Address {
        match self {
            ImageMode::Kernel => KERNEL_START,
            ImageMode::User => USER_START,
        }
    }

    /// The number of memory cells available to the image.  An image
    /// whose final address reaches this value does not fit.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        // Kernel and user images currently run on the same memory.
        match self {
            ImageMode::Kernel | ImageMode::User => RAM_SIZE,
        }
    }

    /// Where the image is written when no output file is specified.
    #[must_use]
    pub fn default_output(&self) -> &'static str {
        match self {
            ImageMode::Kernel => "build/kernel.disk",
            ImageMode::User => "build/user.disk",
        }
    }
}

impl Display for ImageMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageMode::Kernel => "kernel",
            ImageMode::User => "user",
        })
    }
}

#[test]
fn test_origins() {
    assert_eq!(ImageMode::Kernel.origin(), Address::new(41));
    assert_eq!(ImageMode::User.origin(), Address::new(17));
    assert_eq!(ImageMode::default(), ImageMode::Kernel);
}

#[test]
fn test_default_outputs() {
    assert_eq!(ImageMode::Kernel.default_output(), "build/kernel.disk");
    assert_eq!(ImageMode::User.default_output(), "build/user.disk");
}
