use std::convert::Infallible;
use std::ffi::CString;

use nix::unistd::execvp;

use crate::error::{ShellError, ShellResult};

/// Replace this process with `argv[0]`, searched on `PATH`, passing the
/// whole vector as arguments and inheriting the environment.
///
/// Only returns on failure. The caller owns termination of the process:
/// a forked child must exit after this returns, never fall back into the
/// shell's own control flow.
pub fn launch<S: AsRef<str>>(argv: &[S]) -> ShellResult<Infallible> {
    let args = to_c_args(argv)?;
    let Some(program) = args.first() else {
        return Err(ShellError::InvalidArgument("empty command".into()));
    };
    log::debug!("[{}] exec {:?}", std::process::id(), program);
    execvp(program, &args).map_err(|source| ShellError::Launch {
        program: argv[0].as_ref().to_string(),
        source,
    })
}

fn to_c_args<S: AsRef<str>>(argv: &[S]) -> ShellResult<Vec<CString>> {
    argv.iter()
        .map(|arg| {
            CString::new(arg.as_ref())
                .map_err(|_| ShellError::InvalidArgument(format!("NUL byte in {:?}", arg.as_ref())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_args_keep_order() {
        let args = to_c_args(&["ls", "-l"]).unwrap();
        assert_eq!(args[0].to_str().unwrap(), "ls");
        assert_eq!(args[1].to_str().unwrap(), "-l");
    }

    #[test]
    fn c_args_reject_nul() {
        assert!(matches!(
            to_c_args(&["ec\0ho"]),
            Err(ShellError::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty_argv_never_execs() {
        assert!(matches!(
            launch::<&str>(&[]),
            Err(ShellError::InvalidArgument(_))
        ));
    }
}
