use color_eyre::Result;

/// Installs the colored report and panic hooks. Span traces come from the [`tracing_error::ErrorLayer`] installed by
/// [`crate::init_logging`].
pub fn init_errors() -> Result<()> {
    color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .install()
}
