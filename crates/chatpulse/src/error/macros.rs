/// Builds a crate-level [`Error`](crate::Error) from the body of an [`ErrorKind`](crate::ErrorKind)
/// sub-enum variant. Every passed field goes through an [`Into`] conversion, and
/// a field without a value is taken from the variable with the same name.
macro_rules! err {
    (@val $variant_ident:ident $field_val:expr) => ($field_val);
    (@val $variant_ident:ident) => ($variant_ident);
    ($variant_path:path $({
        $( $field_ident:ident $(: $field_val:expr)? ),*
        $(,)?
    })?) => {{
        use $variant_path as Variant;

        $crate::error::Error::from(
            Variant $({$(
                $field_ident: ::std::convert::Into::into(
                    $crate::error::err!(@val $field_ident $($field_val)?)
                )
            ),*})?
        )
    }};
}

/// Shortcut for `map_err` closures that forward the `source` error to the variant.
macro_rules! err_ctx {
    ($variant_path:path $({ $($variant_fields:tt)* })?) => {
        |source| $crate::error::err!($variant_path { source, $($($variant_fields)*)? })
    };
}

/// Creates a [`ConfigError::NotConfigured`](crate::ConfigError::NotConfigured)
/// error for the environment variable with the given name.
macro_rules! not_configured {
    ($var:literal) => {
        $crate::error::err!($crate::ConfigError::NotConfigured { var: $var })
    };
}

pub(crate) use err;
pub(crate) use err_ctx;
pub(crate) use not_configured;
