//! Template-driven C code generation for GUIslice user interfaces.
//!
//! A [`Project`] of pages and widgets is turned into GUIslice API calls by
//! expanding named templates from a [`TemplateStore`]. Which templates a
//! widget produces is decided by a per-kind policy table in [`codegen::policy`].

pub mod cli;
pub mod codegen;
pub mod error;
pub mod expand;
pub mod highlight;
pub mod logging;
pub mod project;
pub mod template;
pub mod widget;

pub use codegen::{CodeGenerator, GeneratorConfig};
pub use error::{CodeGenError, Result};
pub use project::{Page, PageKind, Project, Target};
pub use template::{Template, TemplateStore};
pub use widget::{FontCatalog, WidgetKind, WidgetModel, WidgetType};
