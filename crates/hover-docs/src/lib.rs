pub mod config;
pub mod doc;
pub mod error;
pub mod extract;
pub mod host;
pub mod location;
pub mod normalize;
pub mod render;
pub mod resolver;
pub mod session;
pub mod syntax;
pub mod text;
pub mod window;

pub use config::{DocSettings, DisplaySettings, DisplayStyle, ExtractionSettings};
pub use doc::{DocProvider, DocRequest, DocResult, View};
pub use error::DocError;
pub use host::{FsWorkspace, JsonSymbolIndex, MemoryWorkspace, Style, StyleLookup, SymbolIndex, Workspace};
pub use location::{Candidate, CandidateSet, SourceLocation, SymbolKind};
pub use render::BasicTheme;
pub use session::{DocSession, Navigation, Surface, UiAction};
pub use syntax::{BuiltinSyntax, SyntaxEngine, SyntaxId};
pub use text::{Span, TagRun, Tags, TaggedText};
