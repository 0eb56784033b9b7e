/// Adds conversions `from` and `into` integer to enums
///
/// Takes an enum that must have a `#[repr()]` as first meta field and assigns a
/// value to all enum variants. Values without a variant end up in `Unknown`.
///
/// ```
/// # use geostamp_common::utils::convertible_enum;
/// convertible_enum!(
///     #[repr(u16)]
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub enum Kind {
///         Short = 3,
///         Long = 4,
///     }
/// );
/// let int: u16 = Kind::Long.into();
/// assert_eq!(int, 4);
/// assert_eq!(Kind::from(3), Kind::Short);
/// assert_eq!(Kind::from(9), Kind::Unknown(9));
/// ```
#[macro_export]
macro_rules! convertible_enum {
    (#[repr($type:ty)]$(#[$meta:meta])* $visibility:vis enum $enum_name:ident {
        $($(#[$variant_meta:meta])* $variant_name:ident = $variant_value:expr,)*
    }) => {
        #[repr($type)]
        $(#[$meta])*
        $visibility enum $enum_name {
            $($(#[$variant_meta])* $variant_name = $variant_value,)*
            Unknown($type)
        }

        impl std::convert::From<$type> for $enum_name {
            fn from(v: $type) -> Self {
                match v {
                    $(x if x == $variant_value => Self::$variant_name,)*
                    other => Self::Unknown(other),
                }
            }
        }

        impl std::convert::From<$enum_name> for $type {
            fn from(v: $enum_name) -> $type {
                match v {
                    $($enum_name::$variant_name => $variant_value,)*
                    $enum_name::Unknown(other) => other,
                }
            }
        }
    }
}

pub use convertible_enum;
