//! Newtype IDs for catalog entities.
//!
//! Course and lesson ids travel through URLs (`/courses/{slug}/lesson/{id}`),
//! so each id type parses from a path segment.

/// Macro to define a type-safe numeric ID wrapper.
///
/// Creates a newtype around `u32` with serde (transparent), `Display`,
/// `FromStr` and conversions to and from `u32`.
///
/// ```rust
/// # use atribot_core::define_id;
/// define_id!(WidgetId);
///
/// let id: WidgetId = "7".parse().unwrap();
/// assert_eq!(id, WidgetId::new(7));
/// assert!("seven".parse::<WidgetId>().is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create a new ID from a raw value.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the underlying value.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse::<u32>().map(Self)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(CourseId);
define_id!(LessonId);
