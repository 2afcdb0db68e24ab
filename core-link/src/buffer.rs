//! Reading strings out of native fill-a-buffer calls.

/// Call `fill` with a buffer of `hint` bytes, growing it until the result
/// fits.
///
/// `fill` writes a NUL-terminated, possibly truncated string into the buffer
/// and returns the full length of the string without the terminator. A
/// length equal to or larger than the buffer means the terminator did not
/// fit, so the buffer is resized to `length + 1` and the call repeated.
/// Invalid UTF-8 is decoded lossily.
pub(crate) fn read_growing_buffer(hint: usize, mut fill: impl FnMut(&mut [u8]) -> usize) -> String {
    let mut buffer = vec![0u8; hint.max(1)];
    loop {
        let len = fill(&mut buffer);
        if len < buffer.len() {
            return String::from_utf8_lossy(&buffer[..len]).into_owned();
        }
        buffer.resize(len.saturating_add(1), 0);
    }
}
