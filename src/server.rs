//! MCP server implementation.

use crate::state::MknState;
use crate::tools::browse::{BrowseRequest, handle_browse};
use crate::tools::get::{GetRequest, handle_get};
use crate::tools::load_classification::{LoadClassificationRequest, handle_load_classification};
use crate::tools::search::{SearchRequest, handle_search};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::borrow::Cow;
use std::sync::Arc;

/// MCP Server for MKN-10 diagnosis lookups
#[derive(Clone)]
pub struct MknServer {
    /// Shared state (loaded document, index cache)
    state: Arc<MknState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for MknServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MknServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl MknServer {
    pub fn new(state: Arc<MknState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    pub fn state(&self) -> &Arc<MknState> {
        &self.state
    }

    #[tool(
        description = "Search MKN-10 (Czech ICD-10) diagnoses. A code or code prefix such as 'J06' matches by code; anything else is matched word by word against Czech labels, ignoring case and diacritics.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn mkn_search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(
        description = "Get the full record for one MKN-10 code: Czech and English labels, definition, inclusions, exclusions, modifiers, and its chapter/block/category hierarchy.",
        input_schema = inline_schema_for_type::<GetRequest>()
    )]
    async fn mkn_get(
        &self,
        Parameters(request): Parameters<GetRequest>,
    ) -> std::result::Result<String, String> {
        handle_get(&self.state, request).await
    }

    #[tool(
        description = "Browse the MKN-10 hierarchy. Without a code, lists all chapters. With a code, shows that node and its immediate children.",
        input_schema = inline_schema_for_type::<BrowseRequest>()
    )]
    async fn mkn_browse(
        &self,
        Parameters(request): Parameters<BrowseRequest>,
    ) -> std::result::Result<String, String> {
        handle_browse(&self.state, request).await
    }

    #[tool(
        description = "Load an MKN-10 ClaML XML file and make it the active classification. The previous classification stays active if the file cannot be read or parsed."
    )]
    async fn load_classification(
        &self,
        Parameters(request): Parameters<LoadClassificationRequest>,
    ) -> std::result::Result<String, String> {
        handle_load_classification(&self.state, request).await
    }
}

#[tool_handler]
impl ServerHandler for MknServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "mkn-mcp: Czech MKN-10 (ICD-10) diagnosis lookup. \
                 Use mkn_search to find codes by code prefix or Czech text, mkn_get for full detail, \
                 and mkn_browse to walk chapters, blocks, and categories. \
                 Use load_classification to point the server at a ClaML export if none was configured.",
            )
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this sets `inline_subschemas = true`
/// so optional fields render as plain inputs rather than `$ref` patterns.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let json_object = match object {
        serde_json::Value::Object(object) => object,
        _ => panic!("Schema serialization produced non-object value"),
    };

    Arc::new(json_object)
}
