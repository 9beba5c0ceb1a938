use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display, EnumIter};

//=====================================================================
// Atomic subshells keyed by their ENDF designators. `Invalid` marks an
// interaction that did not involve a particular shell.
//=====================================================================
#[repr(u16)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    TryFromPrimitive,
    IntoPrimitive,
)]
pub enum Subshell {
    Invalid = 0,
    K = 1,
    L1 = 3,
    L2 = 5,
    L3 = 6,
    M1 = 8,
    M2 = 10,
    M3 = 11,
    M4 = 13,
    M5 = 14,
    N1 = 16,
    N2 = 18,
    N3 = 19,
    N4 = 21,
    N5 = 22,
    N6 = 24,
    N7 = 25,
    O1 = 27,
    O2 = 29,
    O3 = 30,
    O4 = 32,
    O5 = 33,
    O6 = 35,
    O7 = 36,
    O8 = 38,
    O9 = 39,
    P1 = 41,
    P2 = 43,
    P3 = 44,
    P4 = 46,
    P5 = 47,
    P6 = 49,
    P7 = 50,
    P8 = 52,
    P9 = 53,
    P10 = 55,
    P11 = 56,
    Q1 = 58,
    Q2 = 60,
    Q3 = 61,
}

impl Default for Subshell {
    fn default() -> Self {
        Subshell::Invalid
    }
}

impl Subshell {
    pub fn from_endf_designator(designator: u16) -> Option<Self> {
        match Subshell::try_from(designator) {
            Ok(Subshell::Invalid) | Err(_) => None,
            Ok(subshell) => Some(subshell),
        }
    }

    pub fn endf_designator(&self) -> u16 {
        u16::from(*self)
    }

    pub fn is_valid(&self) -> bool {
        *self != Subshell::Invalid
    }
}
