use sable_lsp::SableLanguageServer;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

#[tokio::main]
async fn main() {
    let stdin = stdin();
    let stdout = stdout();
    let (service, socket) = LspService::new(SableLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
