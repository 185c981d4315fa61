#![allow(unused_macros, unused_imports)]

macro_rules! debug {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::debug!($($tt)*);
    };
}

macro_rules! warning {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        ::log::warn!($($tt)*);
    };
}

pub(crate) use {debug, warning};
