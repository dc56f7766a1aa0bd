/// Declares a closed set of named constants.
///
/// Each entry gives the canonical wire name, the display label and an
/// optional list of aliases. Parsing matches canonical names and aliases
/// exactly; serialization always writes the canonical name.
///
/// ```ignore
/// variants! {
///     pub enum OrderType("order type", ORDER_TYPES) {
///         Asc => "asc", "ASC";
///         Desc => "desc", "DESC", ["descending"];
///     }
/// }
/// ```
#[macro_export]
macro_rules! variants {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident ($kind:literal, $map:ident) {
            $(
                $(#[$vattr:meta])*
                $variant:ident => $canonical:literal, $label:literal $(, [$($alias:literal),+ $(,)?])?;
            )+
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vattr])* $variant,)+
        }

        $crate::__private::lazy_static! {
            static ref $map: ::std::collections::HashMap<&'static str, $name> = {
                let mut map = ::std::collections::HashMap::new();
                $(
                    map.insert($canonical, $name::$variant);
                    $($(map.insert($alias, $name::$variant);)+)?
                )+
                map
            };
        }

        impl $crate::variant::Variant for $name {
            const KIND: &'static str = $kind;

            fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $canonical,)+
                }
            }

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            fn aliases(&self) -> &'static [&'static str] {
                match self {
                    $($name::$variant => &[$($($alias),+)?],)+
                }
            }

            fn values() -> &'static [Self] {
                &[$($name::$variant,)+]
            }

            fn parse(value: &str) -> $crate::Result<Self> {
                $map.get(value)
                    .copied()
                    .ok_or_else(|| $crate::ApiError::unknown($kind, value))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::variant::Variant::label(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::ApiError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <$name as $crate::variant::Variant>::parse(s)
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str($crate::variant::Variant::name(self))
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let s = <::std::string::String as $crate::__private::serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                <$name as $crate::variant::Variant>::parse(&s)
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}
