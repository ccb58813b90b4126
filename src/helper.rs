/// Formats an error and its whole chain of causes, one `Caused by:` per level.
///
/// Used by the `Debug` implementations of our error enums so that logs keep
/// the full context instead of the top-level variant only.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;

    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
