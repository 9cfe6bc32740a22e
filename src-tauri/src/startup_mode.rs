use std::ffi::OsStr;

use crate::DEV_MODE_FLAG;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupMode {
    pub open_devtools: bool,
}

impl StartupMode {
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        // argv[0] is the executable path and never a flag. Other arguments may
        // be paths that are not valid UTF-8.
        let open_devtools = args
            .into_iter()
            .skip(1)
            .any(|arg| arg.as_ref() == OsStr::new(DEV_MODE_FLAG));
        Self { open_devtools }
    }

    pub fn from_env() -> Self {
        Self::from_args(std::env::args_os())
    }

    pub fn label(self) -> &'static str {
        if self.open_devtools {
            "dev"
        } else {
            "normal"
        }
    }
}
