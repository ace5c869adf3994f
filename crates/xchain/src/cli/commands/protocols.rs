//! `xchain protocols`: the capability matrix.

use std::io::Write;

use xchain_chain::ProtocolRegistry;

use super::CommandError;

/// Prints one line per registered protocol: name, signature algorithm,
/// public key format.
#[derive(Debug, Clone, Default)]
pub struct ProtocolsCommand {
    registry: ProtocolRegistry,
}

impl ProtocolsCommand {
    /// Command over the default registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Command over `registry`.
    #[must_use]
    pub const fn with_registry(registry: ProtocolRegistry) -> Self {
        Self { registry }
    }

    /// Write the matrix to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Output`] if writing fails.
    pub fn run(&self, out: &mut impl Write) -> Result<(), CommandError> {
        writeln!(out, "{:<12} {:<12} {}", "PROTOCOL", "ALGORITHM", "PUBLIC KEY")?;
        for protocol in self.registry.supported_protocols() {
            let algorithm = protocol
                .signature_algorithm()
                .map_or("-", |algorithm| algorithm.as_str());
            let format = protocol
                .public_key_format()
                .map_or("-", |format| format.as_str());
            writeln!(out, "{:<12} {algorithm:<12} {format}", protocol.as_str())?;
        }
        Ok(())
    }
}
