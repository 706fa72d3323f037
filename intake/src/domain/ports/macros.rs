//! Helper macro for port error enums.
//!
//! Each variant becomes a `thiserror` variant plus a snake-case constructor
//! taking `impl Into<_>` for every field, so adapters can write
//! `DiagnosisSinkError::transport(err.to_string())`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),+ },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!(
                        "Construct [`", stringify!($name), "::", stringify!($variant), "`]."
                    )]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Unreachable { message: String } => "unreachable: {message}",
            Throttled { message: String, attempts: u32 } => "throttled after {attempts}: {message}",
        }
    }

    #[test]
    fn constructors_accept_borrowed_strings() {
        let err = SamplePortError::unreachable("relay down");
        assert_eq!(err.to_string(), "unreachable: relay down");
    }

    #[test]
    fn constructors_convert_each_field() {
        let err = SamplePortError::throttled("slow down", 3_u32);
        assert_eq!(err.to_string(), "throttled after 3: slow down");
        assert!(matches!(err, SamplePortError::Throttled { attempts: 3, .. }));
    }
}
