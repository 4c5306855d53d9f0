/// Declares an option enumeration together with its label and device flag tables.
macro_rules! option_table {
    (
        $(#[$meta:meta])*
        $name:ident, flag = $flag:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($label:literal, $value:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every option, in table order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Device flag this option is emitted under.
            pub const FLAG: &'static str = $flag;

            pub fn flag(&self) -> &'static str {
                Self::FLAG
            }

            /// Label shown to users and written to capture records.
            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Value emitted after the device flag.
            pub fn flag_value(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = $crate::errors::ConfigError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let value = value.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label().eq_ignore_ascii_case(value))
                    .ok_or_else(|| $crate::errors::ConfigError::UnknownOption {
                        field: stringify!($name),
                        value: value.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::errors::ConfigError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $name::try_from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.label().to_string()
            }
        }
    };
}
