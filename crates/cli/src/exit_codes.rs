// Exit code registry (single source of truth)

pub const EXIT_SUCCESS: u8 = 0;
/// Runtime failure after a successful load (terminal setup, draw loop)
pub const EXIT_ERROR: u8 = 1;
/// Command-line usage error (clap prints the message, we map the code)
pub const EXIT_USAGE: u8 = 2;
/// Input could not be loaded or a snapshot could not be written
pub const EXIT_IO_ERROR: u8 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_and_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_IO_ERROR];
        assert_eq!(codes, [0, 1, 2, 3]);
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
