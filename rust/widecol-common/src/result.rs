pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Returns `InvalidArgument` from the enclosing function unless `$cond` holds.
///
/// The argument is named by the identifier `$name`; the message is the failed
/// condition, or the formatted message when one is given.
#[macro_export]
macro_rules! verify_arg {
    ($name:ident, $cond:expr) => {
        if !$cond {
            return Err($crate::Error::invalid_arg(
                stringify!($name),
                stringify!($cond),
            ));
        }
    };
    ($name:ident, $cond:expr, $($msg:tt)+) => {
        if !$cond {
            return Err($crate::Error::invalid_arg(stringify!($name), format!($($msg)+)));
        }
    };
}

/// Returns `InvalidFormat` for the stored element `$element` from the enclosing
/// function unless `$cond` holds.
///
/// ```
/// use widecol_common::{Result, verify_data};
///
/// fn check_width(bytes: &[u8]) -> Result<()> {
///     verify_data!("long value", bytes.len() <= 8, "{} bytes", bytes.len());
///     Ok(())
/// }
///
/// let err = check_width(&[0; 9]).unwrap_err();
/// assert_eq!(err.to_string(), "invalid stored format for 'long value': 9 bytes");
/// ```
#[macro_export]
macro_rules! verify_data {
    ($element:expr, $cond:expr) => {
        if !$cond {
            return Err($crate::Error::invalid_format($element, stringify!($cond)));
        }
    };
    ($element:expr, $cond:expr, $($msg:tt)+) => {
        if !$cond {
            return Err($crate::Error::invalid_format($element, format!($($msg)+)));
        }
    };
}
