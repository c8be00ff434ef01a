use crate::codegen::literal::{create_char_literal, create_literal};
use crate::codegen::policy::{EmitPolicy, Literal, policy_for};
use crate::error::{CodeGenError, Result};
use crate::expand::{MacroMap, OutputBuffer, code_writer, expand_macros};
use crate::project::Target;
use crate::template::TemplateStore;
use crate::widget::{FontCatalog, WidgetModel};

/// Per-run settings the emitters read.
#[derive(Clone, Copy, Debug)]
pub struct EmitContext<'a> {
    pub target: Target,
    pub fonts: &'a FontCatalog,
}

/// Template expanded once per listbox item into the `ITEMS` macro.
const LISTBOX_ITEM: &str = "<LISTBOX_ITEM>";

/// Emits `widget` with the policy for its kind and storage mode.
pub fn process(
    ctx: &EmitContext<'_>,
    store: &TemplateStore,
    buffer: &mut OutputBuffer,
    page_enum: &str,
    widget: &WidgetModel,
) -> Result<()> {
    let policy = policy_for(widget.widget_type(), widget.storage);
    emit(policy, ctx, store, buffer, page_enum, widget)
}

/// Emits `widget` with an explicit policy.
///
/// Nothing reaches `buffer` unless every template expanded.
pub fn emit(
    policy: &EmitPolicy,
    ctx: &EmitContext<'_>,
    store: &TemplateStore,
    buffer: &mut OutputBuffer,
    page_enum: &str,
    widget: &WidgetModel,
) -> Result<()> {
    let found = widget.widget_type();
    if policy.widget != found {
        return Err(CodeGenError::ModelTypeMismatch {
            widget: widget.key.clone(),
            expected: policy.widget.name(),
            found: found.name(),
        });
    }

    let mut map = widget.mapped_properties(page_enum, ctx.fonts);
    add_literals(policy.literals, ctx, store, widget, &mut map)
        .map_err(|e| e.for_widget(&widget.key))?;

    let primary = policy.select_primary(widget, ctx.target);
    let blocks = policy.select_blocks(widget, ctx.target);
    log::debug!("{} {}: {primary} {blocks:?}", widget.key, widget.enum_name);

    let mut lines = Vec::new();
    for name in std::iter::once(primary).chain(blocks) {
        let template = store.load_template(name)?;
        let expanded = expand_macros(template, &map).map_err(|e| e.for_widget(&widget.key))?;
        lines.extend(expanded);
    }
    code_writer(buffer, lines);

    Ok(())
}

fn add_literals(
    literals: &[Literal],
    ctx: &EmitContext<'_>,
    store: &TemplateStore,
    widget: &WidgetModel,
    map: &mut MacroMap,
) -> Result<()> {
    if literals.is_empty() {
        return Ok(());
    }
    let font = ctx.fonts.resolve(widget.font_display_name().unwrap_or_default());

    for literal in literals {
        match literal {
            Literal::Text => {
                let text = widget.text().unwrap_or_default();
                // string-enabled text is a C expression, not a label
                let value = if widget.is_string_enabled() && text.chars().count() >= 2 {
                    text.to_string()
                } else {
                    create_literal(font, text)
                };
                map.insert("TEXT".to_string(), value);
            }
            Literal::ListItems => {
                let template = store.load_template(LISTBOX_ITEM)?;
                let mut items = Vec::new();
                for item in widget.list_items() {
                    let item_map = MacroMap::from([("TEXT".to_string(), create_literal(font, item))]);
                    items.extend(expand_macros(template, &item_map)?);
                }
                map.insert("ITEMS".to_string(), items.join("\n"));
            }
            Literal::SpinnerArrows => {
                if let Some((up, down)) = widget.spinner_chars() {
                    map.insert("ARROW_UP".to_string(), create_char_literal(up));
                    map.insert("ARROW_DOWN".to_string(), create_char_literal(down));
                }
            }
        }
    }
    Ok(())
}
