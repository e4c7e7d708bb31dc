//! Main language server implementation

use std::collections::HashMap;
use std::sync::Arc;

use sable::document::{Position as EnginePosition, Range as EngineRange, TextDocument};
use sable_analysis::color::{find_colors, presentations, ColorMatch, Rgb};
use sable_analysis::docblock::docblock_suggestion;
use sable_analysis::signature::{signature_context, SignatureContext};
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    Color, ColorInformation, ColorPresentation, ColorPresentationParams, ColorProviderCapability,
    DocumentColorParams, ExecuteCommandOptions, ExecuteCommandParams, InitializeParams,
    InitializeResult, InitializedParams, ParameterInformation, ParameterLabel, Position,
    Range, ServerCapabilities, ServerInfo, SignatureHelp, SignatureHelpOptions,
    SignatureHelpParams, SignatureInformation, TextDocumentItem, TextDocumentSyncCapability,
    TextDocumentSyncKind, Url, WorkDoneProgressOptions,
};
use tower_lsp::Client;

/// Command id for documentation-block insertion.
pub const INSERT_DOCBLOCK_COMMAND: &str = "sable.insertDocblock";

pub trait LspClient: Send + Sync + Clone + 'static {}
impl LspClient for Client {}

/// Seam between protocol wiring and the engine, mockable in tests.
pub trait FeatureProvider: Send + Sync + 'static {
    fn signature_help(
        &self,
        document: &TextDocument,
        position: EnginePosition,
    ) -> Option<SignatureContext>;
    fn document_colors(&self, document: &TextDocument) -> Vec<ColorMatch>;
    fn docblock(&self, document: &TextDocument, position: EnginePosition) -> Option<String>;
}

#[derive(Default)]
pub struct DefaultFeatureProvider;

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn signature_help(
        &self,
        document: &TextDocument,
        position: EnginePosition,
    ) -> Option<SignatureContext> {
        let ctx = sable::context::document_position_state_context(document, position, false);
        signature_context(&ctx)
    }

    fn document_colors(&self, document: &TextDocument) -> Vec<ColorMatch> {
        let ctx = sable::context::document_state_context(document, false);
        find_colors(&ctx)
    }

    fn docblock(&self, document: &TextDocument, position: EnginePosition) -> Option<String> {
        let ctx = sable::context::document_position_state_context(document, position, false);
        docblock_suggestion(&ctx)
    }
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, Arc<TextDocument>>>,
}

impl DocumentStore {
    async fn upsert(&self, uri: Url, language_id: String, version: i32, text: String) {
        let document = Arc::new(TextDocument::new(language_id, version, text));
        self.entries.write().await.insert(uri, document);
    }

    async fn get(&self, uri: &Url) -> Option<Arc<TextDocument>> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn language_id(&self, uri: &Url) -> Option<String> {
        self.get(uri)
            .await
            .map(|doc| doc.language_id().to_string())
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }
}

pub struct SableLanguageServer<C = Client, P = DefaultFeatureProvider> {
    _client: C,
    documents: DocumentStore,
    features: Arc<P>,
}

impl SableLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new()))
    }
}

impl<C, P> SableLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>) -> Self {
        Self {
            _client: client,
            documents: DocumentStore::default(),
            features,
        }
    }

    async fn document(&self, uri: &Url) -> Option<Arc<TextDocument>> {
        self.documents.get(uri).await
    }
}

fn language_id_for_uri(uri: &Url) -> String {
    if uri.path().ends_with(".sbs") {
        "sable-script".to_string()
    } else {
        "sable".to_string()
    }
}

fn to_lsp_position(position: EnginePosition) -> Position {
    Position::new(position.line as u32, position.column as u32)
}

fn to_lsp_range(range: &EngineRange) -> Range {
    Range {
        start: to_lsp_position(range.start),
        end: to_lsp_position(range.end),
    }
}

fn from_lsp_position(position: Position) -> EnginePosition {
    EnginePosition::new(position.line as usize, position.character as usize)
}

fn to_signature_help(ctx: &SignatureContext) -> Option<SignatureHelp> {
    let signature = ctx.signature?;
    let parameters = signature
        .parameters
        .iter()
        .map(|param| ParameterInformation {
            label: ParameterLabel::Simple(param.name.to_string()),
            documentation: Some(tower_lsp::lsp_types::Documentation::String(
                param.description.to_string(),
            )),
        })
        .collect();
    Some(SignatureHelp {
        signatures: vec![SignatureInformation {
            label: signature.label(),
            documentation: Some(tower_lsp::lsp_types::Documentation::String(
                signature.description.to_string(),
            )),
            parameters: Some(parameters),
            active_parameter: None,
        }],
        active_signature: Some(0),
        active_parameter: Some(ctx.active_parameter),
    })
}

fn to_color_information(color_match: &ColorMatch) -> ColorInformation {
    ColorInformation {
        range: to_lsp_range(&color_match.range),
        color: Color {
            red: color_match.color.r as f32 / 255.0,
            green: color_match.color.g as f32 / 255.0,
            blue: color_match.color.b as f32 / 255.0,
            alpha: 1.0,
        },
    }
}

fn from_lsp_color(color: Color) -> Rgb {
    Rgb {
        r: (color.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        g: (color.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        b: (color.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    }
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for SableLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            signature_help_provider: Some(SignatureHelpOptions {
                trigger_characters: Some(vec!["(".to_string(), ",".to_string()]),
                retrigger_characters: None,
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            color_provider: Some(ColorProviderCapability::Simple(true)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![INSERT_DOCBLOCK_COMMAND.to_string()],
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "sable-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {}

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: lsp_types::DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri,
            language_id,
            version,
            text,
        } = params.text_document;
        self.documents.upsert(uri, language_id, version, text).await;
    }

    async fn did_change(&self, params: lsp_types::DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        let language_id = self
            .documents
            .language_id(&uri)
            .await
            .unwrap_or_else(|| language_id_for_uri(&uri));
        self.documents
            .upsert(uri, language_id, params.text_document.version, change.text)
            .await;
    }

    async fn did_close(&self, params: lsp_types::DidCloseTextDocumentParams) {
        self.documents.remove(&params.text_document.uri).await;
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> Result<Option<SignatureHelp>> {
        let uri = params.text_document_position_params.text_document.uri;
        let Some(document) = self.document(&uri).await else {
            return Ok(None);
        };
        let position = from_lsp_position(params.text_document_position_params.position);
        Ok(self
            .features
            .signature_help(&document, position)
            .as_ref()
            .and_then(to_signature_help))
    }

    async fn document_color(&self, params: DocumentColorParams) -> Result<Vec<ColorInformation>> {
        let Some(document) = self.document(&params.text_document.uri).await else {
            return Ok(Vec::new());
        };
        Ok(self
            .features
            .document_colors(&document)
            .iter()
            .map(to_color_information)
            .collect())
    }

    async fn color_presentation(
        &self,
        params: ColorPresentationParams,
    ) -> Result<Vec<ColorPresentation>> {
        let color = from_lsp_color(params.color);
        Ok(presentations(color)
            .into_iter()
            .map(|label| ColorPresentation {
                label,
                text_edit: None,
                additional_text_edits: None,
            })
            .collect())
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        if params.command != INSERT_DOCBLOCK_COMMAND {
            return Ok(None);
        }
        let mut args = params.arguments.into_iter();
        let Some(uri) = args
            .next()
            .and_then(|v| serde_json::from_value::<Url>(v).ok())
        else {
            return Ok(None);
        };
        let Some(position) = args
            .next()
            .and_then(|v| serde_json::from_value::<Position>(v).ok())
        else {
            return Ok(None);
        };
        let Some(document) = self.document(&uri).await else {
            return Ok(None);
        };
        Ok(self
            .features
            .docblock(&document, from_lsp_position(position))
            .map(serde_json::Value::String))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower_lsp::lsp_types::{
        DidOpenTextDocumentParams, PartialResultParams, SignatureHelpContext,
        SignatureHelpTriggerKind, TextDocumentIdentifier, TextDocumentPositionParams,
        WorkDoneProgressParams,
    };
    use tower_lsp::LanguageServer;

    #[derive(Clone, Default)]
    struct NoopClient;
    impl LspClient for NoopClient {}

    #[derive(Default)]
    struct MockFeatureProvider {
        signature_called: AtomicUsize,
        colors_called: AtomicUsize,
        docblock_called: AtomicUsize,
        last_signature_position: Mutex<Option<EnginePosition>>,
    }

    impl FeatureProvider for MockFeatureProvider {
        fn signature_help(
            &self,
            _: &TextDocument,
            position: EnginePosition,
        ) -> Option<SignatureContext> {
            self.signature_called.fetch_add(1, Ordering::SeqCst);
            *self.last_signature_position.lock().unwrap() = Some(position);
            None
        }

        fn document_colors(&self, document: &TextDocument) -> Vec<ColorMatch> {
            self.colors_called.fetch_add(1, Ordering::SeqCst);
            vec![ColorMatch {
                range: document.range_at(0..4),
                color: Rgb { r: 255, g: 0, b: 0 },
            }]
        }

        fn docblock(&self, _: &TextDocument, _: EnginePosition) -> Option<String> {
            self.docblock_called.fetch_add(1, Ordering::SeqCst);
            Some("/** */".to_string())
        }
    }

    fn sample_uri() -> Url {
        Url::parse("file:///sample.sbs").unwrap()
    }

    fn open_params(text: &str) -> DidOpenTextDocumentParams {
        DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: sample_uri(),
                language_id: "sable-script".to_string(),
                version: 1,
                text: text.to_string(),
            },
        }
    }

    fn signature_params(line: u32, character: u32) -> SignatureHelpParams {
        SignatureHelpParams {
            context: Some(SignatureHelpContext {
                trigger_kind: SignatureHelpTriggerKind::INVOKED,
                trigger_character: None,
                is_retrigger: false,
                active_signature_help: None,
            }),
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                position: Position::new(line, character),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
        }
    }

    fn mock_server() -> (SableLanguageServer<NoopClient, MockFeatureProvider>, Arc<MockFeatureProvider>) {
        let features = Arc::new(MockFeatureProvider::default());
        (
            SableLanguageServer::with_features(NoopClient, features.clone()),
            features,
        )
    }

    fn default_server() -> SableLanguageServer<NoopClient, DefaultFeatureProvider> {
        SableLanguageServer::with_features(NoopClient, Arc::new(DefaultFeatureProvider::new()))
    }

    #[tokio::test]
    async fn routes_signature_help_to_the_provider() {
        let (server, features) = mock_server();
        server.did_open(open_params("find(")).await;
        let result = server.signature_help(signature_params(0, 5)).await.unwrap();
        assert!(result.is_none());
        assert_eq!(features.signature_called.load(Ordering::SeqCst), 1);
        assert_eq!(
            *features.last_signature_position.lock().unwrap(),
            Some(EnginePosition::new(0, 5))
        );
    }

    #[tokio::test]
    async fn unknown_documents_yield_no_results() {
        let (server, features) = mock_server();
        let result = server.signature_help(signature_params(0, 0)).await.unwrap();
        assert!(result.is_none());
        assert_eq!(features.signature_called.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn converts_color_matches_to_protocol_shapes() {
        let (server, _) = mock_server();
        server.did_open(open_params("#f00 and more")).await;
        let colors = server
            .document_color(DocumentColorParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                work_done_progress_params: WorkDoneProgressParams::default(),
                partial_result_params: PartialResultParams::default(),
            })
            .await
            .unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].range.start, Position::new(0, 0));
        assert!((colors[0].color.red - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn signature_help_end_to_end_with_the_default_provider() {
        let server = default_server();
        server.did_open(open_params("x = find(needle, ")).await;
        let help = server
            .signature_help(signature_params(0, 17))
            .await
            .unwrap()
            .expect("known function should produce help");
        assert_eq!(help.signatures.len(), 1);
        assert!(help.signatures[0].label.starts_with("find("));
        assert_eq!(help.active_parameter, Some(1));
    }

    #[tokio::test]
    async fn signature_help_declines_inside_comments() {
        let server = default_server();
        server.did_open(open_params("// find(\nbar(1)")).await;
        let help = server.signature_help(signature_params(0, 8)).await.unwrap();
        assert!(help.is_none());
    }

    #[tokio::test]
    async fn docblock_command_returns_snippet_text() {
        let server = default_server();
        server
            .did_open(open_params("\nfunction greet(name) {}\n"))
            .await;
        let result = server
            .execute_command(ExecuteCommandParams {
                command: INSERT_DOCBLOCK_COMMAND.to_string(),
                arguments: vec![
                    serde_json::to_value(sample_uri()).unwrap(),
                    serde_json::to_value(Position::new(0, 0)).unwrap(),
                ],
                work_done_progress_params: WorkDoneProgressParams::default(),
            })
            .await
            .unwrap();
        let serde_json::Value::String(text) = result.expect("docblock expected") else {
            panic!("expected string result");
        };
        assert!(text.contains("@param name"));
    }

    #[tokio::test]
    async fn did_change_replaces_the_snapshot() {
        let server = default_server();
        server.did_open(open_params("len(")).await;
        server
            .did_change(lsp_types::DidChangeTextDocumentParams {
                text_document: lsp_types::VersionedTextDocumentIdentifier {
                    uri: sample_uri(),
                    version: 2,
                },
                content_changes: vec![lsp_types::TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: "slice(list, ".to_string(),
                }],
            })
            .await;
        let help = server
            .signature_help(signature_params(0, 12))
            .await
            .unwrap()
            .expect("help after change");
        assert!(help.signatures[0].label.starts_with("slice("));
    }
}
