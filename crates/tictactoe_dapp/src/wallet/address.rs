//! Account address validation.

use tictactoe_core::Address;

/// Length of a full account address including the `0x` prefix.
pub const ADDRESS_LEN: usize = 66;

/// Validates an opponent address typed by the user.
///
/// Surrounding whitespace is ignored. The message in the error is the
/// notice shown to the user.
pub fn parse_opponent_address(input: &str) -> Result<Address, &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Please enter opponent address");
    }
    if !trimmed.starts_with("0x") || trimmed.chars().count() != ADDRESS_LEN {
        return Err("Invalid wallet address format");
    }
    Ok(Address::new(trimmed))
}
