use std::fmt;

/// Built-in scalar types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementaryType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Bool,
    Nil,
}

impl ElementaryType {
    /// Every elementary type, in declaration order.
    pub const ALL: [ElementaryType; 13] = [
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::String,
        Self::Bool,
        Self::Nil,
    ];

    /// Returns the source-level name of the type
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Nil => "nil",
        }
    }

    /// Looks up an elementary type by its source-level name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
        )
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Width in bits of numeric types, `None` for everything else.
    pub const fn bit_width(self) -> Option<u32> {
        match self {
            Self::I8 | Self::U8 => Some(8),
            Self::I16 | Self::U16 => Some(16),
            Self::I32 | Self::U32 | Self::F32 => Some(32),
            Self::I64 | Self::U64 | Self::F64 => Some(64),
            Self::String | Self::Bool | Self::Nil => None,
        }
    }

    /// Inclusive `(min, max)` of integer types, `None` for everything else.
    pub const fn int_range(self) -> Option<(i128, i128)> {
        match self {
            Self::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::U8 => Some((0, u8::MAX as i128)),
            Self::U16 => Some((0, u16::MAX as i128)),
            Self::U32 => Some((0, u32::MAX as i128)),
            Self::U64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }
}

impl fmt::Display for ElementaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for etype in ElementaryType::ALL {
            assert_eq!(ElementaryType::from_name(etype.name()), Some(etype));
        }
        assert_eq!(ElementaryType::from_name("int128"), None);
    }

    #[test]
    fn test_categories() {
        assert!(ElementaryType::U16.is_integer());
        assert!(!ElementaryType::U16.is_signed());
        assert!(ElementaryType::I64.is_signed());
        assert!(ElementaryType::F32.is_float());
        assert!(!ElementaryType::Bool.is_numeric());
        assert_eq!(ElementaryType::F32.bit_width(), Some(32));
        assert_eq!(ElementaryType::String.bit_width(), None);
    }

    #[test]
    fn test_int_range() {
        assert_eq!(ElementaryType::U8.int_range(), Some((0, 255)));
        assert_eq!(ElementaryType::I8.int_range(), Some((-128, 127)));
        assert_eq!(
            ElementaryType::U64.int_range(),
            Some((0, i128::from(u64::MAX)))
        );
        assert_eq!(ElementaryType::F64.int_range(), None);
    }
}
