//! Defines helper macros for generating domain port error enums.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum RelayPortError {
            Offline { message: String } => "backend offline: {message}",
            Status { code: u16 } => "unexpected status {code}",
            Rejected { message: String, code: u16 } => "rejected: {message} ({code})",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = RelayPortError::offline("dns lookup failed");
        assert_eq!(err.to_string(), "backend offline: dns lookup failed");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = RelayPortError::status(503_u16);
        assert_eq!(err.to_string(), "unexpected status 503");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = RelayPortError::rejected("quota", 429_u16);
        assert_eq!(err.to_string(), "rejected: quota (429)");
    }
}
