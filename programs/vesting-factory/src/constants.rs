pub const FACTORY_SEED: &[u8] = b"factory";
pub const IMPLEMENTATION_SEED: &[u8] = b"implementation";
pub const VAULT_SEED: &[u8] = b"vault";
pub const VAULT_TOKEN_SEED: &[u8] = b"vault_tokens";
