//! Handing the finished PDF to the desktop: preview and print

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Open a file with the system default application
pub fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Build the spooler command for `path`, optionally targeting a named printer
pub fn print_command(path: &Path, printer: Option<&str>) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("powershell");
        cmd.args(["-NoProfile", "-Command", &powershell_print_script(path, printer)]);
        cmd
    } else {
        let mut cmd = Command::new("lp");
        if let Some(name) = printer {
            cmd.arg("-d").arg(name);
        }
        cmd.arg(path);
        cmd
    }
}

/// Quote for a single-quoted PowerShell string, where `'` is written `''`
fn ps_quote(s: &str) -> String {
    s.replace('\'', "''")
}

fn powershell_print_script(path: &Path, printer: Option<&str>) -> String {
    let file = ps_quote(&path.display().to_string());
    match printer {
        Some(name) => format!(
            "Start-Process -FilePath '{}' -Verb PrintTo -ArgumentList '\"{}\"'",
            file,
            ps_quote(name)
        ),
        None => format!("Start-Process -FilePath '{}' -Verb Print", file),
    }
}

/// Send a file to the system print spooler and wait for it to accept the job
pub fn print_file(path: &Path, printer: Option<&str>) -> Result<()> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let mut cmd = print_command(path, printer);
    log::debug!("Running {:?}", cmd);
    let output = cmd.output()
        .map_err(|e| Error::Print(format!("could not run {:?}: {}", cmd.get_program(), e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Print(format!("{} ({})", stderr.trim(), output.status)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        log::info!("{}", stdout.trim());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[cfg(unix)]
    #[test]
    fn test_print_command_uses_lp() {
        let cmd = print_command(Path::new("/tmp/out.pdf"), Some("office"));
        assert_eq!(cmd.get_program(), "lp");
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(args, vec![OsStr::new("-d"), OsStr::new("office"), OsStr::new("/tmp/out.pdf")]);

        let cmd = print_command(Path::new("out.pdf"), None);
        assert_eq!(cmd.get_args().count(), 1);
    }

    #[test]
    fn test_powershell_script_escapes_quotes() {
        let script = powershell_print_script(Path::new("Bob's scans.pdf"), None);
        assert_eq!(script, "Start-Process -FilePath 'Bob''s scans.pdf' -Verb Print");

        let script = powershell_print_script(Path::new("out.pdf"), Some("Ann's HP"));
        assert_eq!(
            script,
            "Start-Process -FilePath 'out.pdf' -Verb PrintTo -ArgumentList '\"Ann''s HP\"'"
        );
    }

    #[test]
    fn test_print_missing_file() {
        let result = print_file(Path::new("/definitely/not/here.pdf"), None);
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }
}
