use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::client::DocumentAction;
use crate::database::models::Document;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ "message": message });
            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print what a command dispatched. An empty slice means the call failed and was logged.
pub fn output_actions(output_format: &OutputFormat, actions: &[DocumentAction]) -> anyhow::Result<()> {
    if actions.is_empty() {
        anyhow::bail!("request failed; run with RUST_LOG=docman_api=debug for details");
    }

    for action in actions {
        match output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(action)?),
            OutputFormat::Text => print_action(action),
        }
    }
    Ok(())
}

fn print_action(action: &DocumentAction) {
    match action {
        DocumentAction::GetUserDocument(docs)
        | DocumentAction::GetAllPublicDocuments(docs)
        | DocumentAction::SearchPublicDocuments(docs)
        | DocumentAction::SearchMyDocuments(docs) => print_documents(docs),
        DocumentAction::GetOneDocumentSuccess(doc) => print_document(doc),
        DocumentAction::CreateDocumentSuccess(result) | DocumentAction::UpdateDocumentSuccess(result) => {
            println!("✓ {}", result.message);
            print_document(&result.document);
        }
        DocumentAction::DeleteUserDocument(msg) | DocumentAction::DeleteUserSuccess(msg) => {
            println!("✓ {}", msg.message);
        }
    }
}

fn print_documents(documents: &[Document]) {
    if documents.is_empty() {
        println!("No documents found");
        return;
    }
    println!("{:<6} {:<8} {:<8} TITLE", "ID", "ACCESS", "OWNER");
    for doc in documents {
        println!("{:<6} {:<8} {:<8} {}", doc.id, doc.access.as_str(), doc.user_id, doc.title);
    }
}

fn print_document(doc: &Document) {
    println!("#{} {} [{}] owner {}", doc.id, doc.title, doc.access, doc.user_id);
    println!("updated {}", doc.updated_at.format("%Y-%m-%d %H:%M:%S"));
    println!();
    println!("{}", doc.content);
}
