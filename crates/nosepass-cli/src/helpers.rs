//! Secret entry and output helpers.

use std::io::{self, BufRead, Read, Write};

use dialoguer::Password as PasswordPrompt;
use nosepass_core::passphrase::MAX_PASSPHRASE_LENGTH;
use nosepass_core::{NosepassError, Password};
use secrecy::{SecretBox, SecretSlice};
use zeroize::Zeroizing;

/// Read buffer size: the longest passphrase, its newline, and one byte to
/// detect overflow.
const LINE_CAPACITY: usize = MAX_PASSPHRASE_LENGTH + 2;

/// Read the master passphrase.
///
/// On a terminal, prompts on stderr with echo disabled. Otherwise reads a
/// single line of raw bytes from stdin. The trailing newline is stripped;
/// emptiness is checked in the pipeline.
pub fn read_passphrase(interactive: bool) -> Result<SecretSlice<u8>, NosepassError> {
    if interactive {
        let value = Zeroizing::new(
            PasswordPrompt::new()
                .with_prompt("Password")
                .allow_empty_password(true)
                .interact()
                .map_err(|e| NosepassError::InputIo(format!("failed to read password: {}", e)))?,
        );
        return Ok(SecretBox::new(Box::from(value.as_bytes())));
    }

    read_passphrase_line(&mut io::stdin().lock())
}

/// Read one line of bytes as the passphrase.
pub fn read_passphrase_line(input: &mut impl BufRead) -> Result<SecretSlice<u8>, NosepassError> {
    let mut line = Zeroizing::new(Vec::with_capacity(LINE_CAPACITY));
    read_bounded_line(input, &mut line)?;

    // Exact-size copy; the read buffer is wiped on drop
    Ok(SecretBox::new(Box::from(line.as_slice())))
}

/// Read up to `LINE_CAPACITY` bytes into `line`, which never grows past
/// that, and strip the newline.
fn read_bounded_line(input: &mut impl BufRead, line: &mut Vec<u8>) -> Result<(), NosepassError> {
    let read = input
        .take(LINE_CAPACITY as u64)
        .read_until(b'\n', line)
        .map_err(|e| NosepassError::InputIo(format!("failed to read password: {}", e)))?;
    if read == 0 {
        return Err(NosepassError::InputIo(
            "failed to read password: end of input".to_string(),
        ));
    }

    if line.last() == Some(&b'\n') {
        line.pop();
    } else if line.len() >= LINE_CAPACITY {
        return Err(NosepassError::InputIo(format!(
            "the maximum password length is {} characters",
            MAX_PASSPHRASE_LENGTH
        )));
    }
    Ok(())
}

/// Write the password to `out` with no trailing newline, then flush.
pub fn write_password(out: &mut impl Write, password: &Password) -> Result<(), NosepassError> {
    out.write_all(password.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| NosepassError::OutputIo(format!("failed to write output: {}", e)))
}
