/// Build the reflection records of one source file.
///
/// This is the main public entrypoint for building; [`crate::Broker::process_tokens`] calls it before registering
/// anything.
///
/// ## Parameters
/// - `tokens`: every token of the file, trivia included, as produced by `tokenreflect_syntax::lexer`.
/// - `file_name`: recorded on every declaration.
///
/// ## Errors
/// See [`DeclarationBuilder::build`].
#[tracing::instrument(level = "debug", skip_all, fields(file = file_name, token_count = tokens.len()))]
pub fn build_file(tokens: Vec<Token>, file_name: &str, config: &BrokerConfig) -> Result<ReflectionFile, ReflectionError> {
    DeclarationBuilder::new(tokens, file_name, config).build()
}
