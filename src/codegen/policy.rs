//! Which templates each widget kind emits, and in what order.
//!
//! Every (kind, storage) pair has one [`EmitPolicy`]: a primary rule that
//! picks the creation template, then a fixed sequence of gated modifier
//! blocks. A block may carry child blocks that are only considered when the
//! parent block itself was emitted. Kinds without a PROGMEM API share one
//! policy for both storage modes.

use Gate::*;
use StorageMode::{Flash, Ram};

use crate::project::Target;
use crate::widget::{GROUP_ID_NONE, RingGaugeProps, SpinnerProps, StorageMode, WidgetModel, WidgetType};

/// A boolean condition read off a widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    DrawFunc,
    TickFunc,
    Rounded,
    TouchEn,
    FillDisabled,
    FrameEnabled,
    FrameDisabled,
    CallbackEn,
    /// Group id other than `GSLC_GROUP_ID_NONE`.
    Grouped,
    /// Non-empty element reference.
    ElementRef,
    Utf8,
    /// UTF8 text on a Linux target; Arduino builds select the encoding globally.
    Utf8OnLinux,
    TextStorage,
    TextMargin,
    CustomColors,
    CustomTextColor,
    CustomAlign,
    ImageDefine,
    Toggle,
    Transparent,
    Scrollbar,
    ItemGap,
    HasItems,
    CustomArrows,
    RingLine,
    RingSegments,
    RingAngles,
    RingGradient,
    /// Flat active color that is not the default; never with a gradient.
    RingFlatColor,
    RingInactiveColor,
    RingFillColor,
}

impl Gate {
    pub fn holds(self, widget: &WidgetModel, target: Target) -> bool {
        let ring = |check: fn(&RingGaugeProps) -> bool| widget.ring_gauge().is_some_and(check);
        match self {
            Gate::DrawFunc => widget.has_draw_func(),
            Gate::TickFunc => widget.has_tick_func(),
            Gate::Rounded => widget.is_rounded_en(),
            Gate::TouchEn => widget.is_touch_en(),
            Gate::FillDisabled => !widget.is_fill_enabled(),
            Gate::FrameEnabled => widget.is_frame_enabled(),
            Gate::FrameDisabled => !widget.is_frame_enabled(),
            Gate::CallbackEn => widget.is_callback_en(),
            Gate::Grouped => widget.group_id() != GROUP_ID_NONE,
            Gate::ElementRef => !widget.element_ref().is_empty(),
            Gate::Utf8 => widget.is_utf8(),
            Gate::Utf8OnLinux => widget.is_utf8() && target == Target::Linux,
            Gate::TextStorage => widget.text_storage() > 0,
            Gate::TextMargin => widget.text_margin() > 0,
            Gate::CustomColors => widget.has_custom_colors(),
            Gate::CustomTextColor => widget.has_custom_text_color(),
            Gate::CustomAlign => widget.has_custom_align(),
            Gate::ImageDefine => widget.uses_image_define(),
            Gate::Toggle => widget.is_toggle(),
            Gate::Transparent => widget.is_transparent(),
            Gate::Scrollbar => widget.scrollbar().is_some(),
            Gate::ItemGap => widget.item_gap() > 0,
            Gate::HasItems => !widget.list_items().is_empty(),
            Gate::CustomArrows => widget.spinner_chars().is_some_and(|chars| {
                chars != (SpinnerProps::DEF_INCR_CHAR, SpinnerProps::DEF_DECR_CHAR)
            }),
            Gate::RingLine => ring(|p| p.line_size != RingGaugeProps::DEF_LINE_SIZE),
            Gate::RingSegments => ring(|p| p.segments != RingGaugeProps::DEF_SEGMENTS),
            Gate::RingAngles => ring(RingGaugeProps::has_custom_angles),
            Gate::RingGradient => ring(|p| p.gradient),
            Gate::RingFlatColor => {
                ring(|p| !p.gradient && p.active_color != RingGaugeProps::DEF_ACTIVE_COLOR)
            }
            Gate::RingInactiveColor => {
                ring(|p| p.inactive_color != RingGaugeProps::DEF_INACTIVE_COLOR)
            }
            Gate::RingFillColor => ring(|p| p.fill_color != RingGaugeProps::DEF_FILL_COLOR),
        }
    }
}

/// A macro computed by the emitter because it depends on the widget's font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Literal {
    /// `TEXT`: the widget text as a C string literal.
    Text,
    /// `ITEMS`: one `<LISTBOX_ITEM>` expansion per list entry.
    ListItems,
    /// `ARROW_UP` and `ARROW_DOWN`: spinner button labels as char literals.
    SpinnerArrows,
}

/// Primary template chosen when every gate holds.
#[derive(Debug)]
pub struct PrimaryRule {
    pub gates: &'static [Gate],
    pub template: &'static str,
}

#[derive(Debug)]
pub struct Block {
    pub gate: Gate,
    pub template: &'static str,
    pub then: &'static [Block],
}

const fn block(gate: Gate, template: &'static str) -> Block {
    Block {
        gate,
        template,
        then: &[],
    }
}

const fn nested(gate: Gate, template: &'static str, then: &'static [Block]) -> Block {
    Block {
        gate,
        template,
        then,
    }
}

const fn rule(gates: &'static [Gate], template: &'static str) -> PrimaryRule {
    PrimaryRule { gates, template }
}

#[derive(Debug)]
pub struct EmitPolicy {
    pub widget: WidgetType,
    pub storage: StorageMode,
    /// Tried in order; the first rule whose gates all hold wins. Rules with
    /// more gates come first.
    pub primary: &'static [PrimaryRule],
    pub default: &'static str,
    pub blocks: &'static [Block],
    /// Font-encoded macros added to the map before expansion.
    pub literals: &'static [Literal],
}

impl EmitPolicy {
    /// Primary template for `widget`.
    pub fn select_primary(&self, widget: &WidgetModel, target: Target) -> &'static str {
        self.primary
            .iter()
            .find(|r| r.gates.iter().all(|g| g.holds(widget, target)))
            .map_or(self.default, |r| r.template)
    }

    /// Modifier templates for `widget` in emission order.
    pub fn select_blocks(&self, widget: &WidgetModel, target: Target) -> Vec<&'static str> {
        let mut selected = Vec::new();
        collect_blocks(self.blocks, widget, target, &mut selected);
        selected
    }
}

fn collect_blocks(
    blocks: &'static [Block],
    widget: &WidgetModel,
    target: Target,
    selected: &mut Vec<&'static str>,
) {
    for b in blocks {
        if b.gate.holds(widget, target) {
            selected.push(b.template);
            collect_blocks(b.then, widget, target, selected);
        }
    }
}

// TEXT_UTF8_P addresses the element through its saved reference.
const UTF8_AFTER_FIND_P: &[Block] = &[block(Utf8, "<TEXT_UTF8_P>")];

static BOX_P: EmitPolicy = EmitPolicy {
    widget: WidgetType::Box,
    storage: Flash,
    primary: &[
        rule(&[DrawFunc, TickFunc], "<BOX_ALL_FUNCT_P>"),
        rule(&[DrawFunc], "<BOX_DRAW_FUNCT_P>"),
        rule(&[TickFunc], "<BOX_TICK_FUNCT_P>"),
    ],
    default: "<BOX_P>",
    blocks: &[
        block(Rounded, "<CORNERS_ROUNDED_P>"),
        block(TouchEn, "<TOUCH_EN_P>"),
        block(ElementRef, "<ELEMENT_REF_FIND_P>"),
    ],
    literals: &[],
};

static BOX: EmitPolicy = EmitPolicy {
    widget: WidgetType::Box,
    storage: Ram,
    primary: &[],
    default: "<BOX>",
    blocks: &[
        block(Rounded, "<CORNERS_ROUNDED>"),
        block(TouchEn, "<TOUCH_EN>"),
        block(DrawFunc, "<DRAWFUNC>"),
        block(TickFunc, "<TICKFUNC>"),
        block(CustomColors, "<COLOR>"),
        block(FrameDisabled, "<FRAME_EN>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[],
};

static TEXT_P: EmitPolicy = EmitPolicy {
    widget: WidgetType::Text,
    storage: Flash,
    primary: &[rule(&[TextStorage], "<TEXT_UPDATE_P>")],
    default: "<TEXT_P>",
    blocks: &[
        block(FillDisabled, "<FILL_EN_P>"),
        block(FrameEnabled, "<FRAME_EN_P>"),
        nested(ElementRef, "<ELEMENT_REF_FIND_P>", UTF8_AFTER_FIND_P),
    ],
    literals: &[Literal::Text],
};

static TEXT: EmitPolicy = EmitPolicy {
    widget: WidgetType::Text,
    storage: Ram,
    primary: &[rule(&[TextStorage], "<TEXT_UPDATE>")],
    default: "<TEXT>",
    blocks: &[
        block(CustomAlign, "<TEXTALIGN>"),
        block(TextMargin, "<TEXT_MARGIN>"),
        block(FillDisabled, "<FILL_EN>"),
        block(FrameEnabled, "<FRAME_EN>"),
        block(CustomTextColor, "<TEXT_COLOR>"),
        block(CustomColors, "<COLOR>"),
        block(Utf8OnLinux, "<TEXT_UTF8>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[Literal::Text],
};

static TXTBUTTON_P: EmitPolicy = EmitPolicy {
    widget: WidgetType::TextButton,
    storage: Flash,
    primary: &[rule(&[TextStorage], "<TXTBUTTON_UPDATE_P>")],
    default: "<TXTBUTTON_P>",
    blocks: &[
        block(Rounded, "<CORNERS_ROUNDED_P>"),
        block(FillDisabled, "<FILL_EN_P>"),
        block(FrameDisabled, "<FRAME_EN_P>"),
        nested(ElementRef, "<ELEMENT_REF_FIND_P>", UTF8_AFTER_FIND_P),
    ],
    literals: &[Literal::Text],
};

static TXTBUTTON: EmitPolicy = EmitPolicy {
    widget: WidgetType::TextButton,
    storage: Ram,
    primary: &[rule(&[TextStorage], "<TXTBUTTON_UPDATE>")],
    default: "<TXTBUTTON>",
    blocks: &[
        block(CustomAlign, "<TEXTALIGN>"),
        block(TextMargin, "<TEXT_MARGIN>"),
        block(CustomTextColor, "<TEXT_COLOR>"),
        block(CustomColors, "<COLOR>"),
        block(Utf8, "<TEXT_UTF8>"),
        block(Rounded, "<CORNERS_ROUNDED>"),
        block(FillDisabled, "<FILL_EN>"),
        block(FrameDisabled, "<FRAME_EN>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[Literal::Text],
};

static CHECKBOX_P: EmitPolicy = EmitPolicy {
    widget: WidgetType::CheckBox,
    storage: Flash,
    primary: &[],
    default: "<CHECKBOX_P>",
    blocks: &[
        block(CallbackEn, "<CHECKBOXSETSTATE_P>"),
        block(ElementRef, "<ELEMENT_REF_FIND_P>"),
    ],
    literals: &[],
};

static CHECKBOX: EmitPolicy = EmitPolicy {
    widget: WidgetType::CheckBox,
    storage: Ram,
    primary: &[],
    default: "<CHECKBOX>",
    blocks: &[
        block(CustomColors, "<COLOR>"),
        block(CallbackEn, "<CHECKBOXSETSTATE>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[],
};

static RADIOBUTTON_P: EmitPolicy = EmitPolicy {
    widget: WidgetType::RadioButton,
    storage: Flash,
    primary: &[],
    default: "<RADIOBUTTON_P>",
    blocks: &[
        block(CallbackEn, "<CHECKBOXSETSTATE_P>"),
        block(ElementRef, "<ELEMENT_REF_FIND_P>"),
    ],
    literals: &[],
};

static RADIOBUTTON: EmitPolicy = EmitPolicy {
    widget: WidgetType::RadioButton,
    storage: Ram,
    primary: &[],
    default: "<RADIOBUTTON>",
    blocks: &[
        block(CustomColors, "<COLOR>"),
        block(CallbackEn, "<CHECKBOXSETSTATE>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[],
};

static TOGGLEBUTTON_P: EmitPolicy = EmitPolicy {
    widget: WidgetType::ToggleButton,
    storage: Flash,
    primary: &[],
    default: "<TOGGLEBUTTON_P>",
    blocks: &[block(Grouped, "<GROUP>")],
    literals: &[],
};

static TOGGLEBUTTON: EmitPolicy = EmitPolicy {
    widget: WidgetType::ToggleButton,
    storage: Ram,
    primary: &[],
    default: "<TOGGLEBUTTON>",
    blocks: &[
        block(Grouped, "<GROUP>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[],
};

static PROGRESSBAR_P: EmitPolicy = EmitPolicy {
    widget: WidgetType::ProgressBar,
    storage: Flash,
    primary: &[],
    default: "<PROGRESSBAR_P>",
    blocks: &[block(ElementRef, "<ELEMENT_REF_FIND_P>")],
    literals: &[],
};

static PROGRESSBAR: EmitPolicy = EmitPolicy {
    widget: WidgetType::ProgressBar,
    storage: Ram,
    primary: &[],
    default: "<PROGRESSBAR>",
    blocks: &[
        block(CustomColors, "<COLOR>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[],
};

static SLIDER_P: EmitPolicy = EmitPolicy {
    widget: WidgetType::Slider,
    storage: Flash,
    primary: &[],
    default: "<SLIDER_P>",
    blocks: &[block(ElementRef, "<ELEMENT_REF_FIND_P>")],
    literals: &[],
};

static SLIDER: EmitPolicy = EmitPolicy {
    widget: WidgetType::Slider,
    storage: Ram,
    primary: &[],
    default: "<SLIDER>",
    blocks: &[block(ElementRef, "<ELEMENT_REF>")],
    literals: &[],
};

static IMAGE: EmitPolicy = EmitPolicy {
    widget: WidgetType::Image,
    storage: Ram,
    primary: &[rule(&[ImageDefine], "<IMAGE_DEFINE>")],
    default: "<IMAGE_EXTERN>",
    blocks: &[
        block(Transparent, "<IMAGETRANSPARENT>"),
        block(TouchEn, "<TOUCH_EN>"),
        block(FrameEnabled, "<FRAME_EN>"),
        block(FrameEnabled, "<COLOR_IMAGE>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[],
};

static IMGBUTTON: EmitPolicy = EmitPolicy {
    widget: WidgetType::ImgButton,
    storage: Ram,
    primary: &[
        rule(&[ImageDefine, Toggle], "<IMGTOGGLE_DEFINE>"),
        rule(&[ImageDefine], "<IMGBUTTON_DEFINE>"),
        rule(&[Toggle], "<IMGTOGGLE_EXTERN>"),
    ],
    default: "<IMGBUTTON_EXTERN>",
    blocks: &[
        block(Transparent, "<IMGBTNTRANSPARENT>"),
        block(FrameEnabled, "<FRAME_EN>"),
        block(FrameEnabled, "<COLOR_IMAGE>"),
        block(Grouped, "<GROUP>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[],
};

static LINE: EmitPolicy = EmitPolicy {
    widget: WidgetType::Line,
    storage: Ram,
    primary: &[],
    default: "<LINE>",
    blocks: &[block(ElementRef, "<ELEMENT_REF>")],
    literals: &[],
};

// The scrollbar slider replaces pElemRef, so it comes last.
static LISTBOX: EmitPolicy = EmitPolicy {
    widget: WidgetType::ListBox,
    storage: Ram,
    primary: &[rule(&[Scrollbar], "<LISTBOXSLIDER_1>")],
    default: "<LISTBOX>",
    blocks: &[
        block(ItemGap, "<LISTBOX_GAP>"),
        block(HasItems, "<LISTBOX_ITEMS>"),
        block(CustomAlign, "<TEXTALIGN>"),
        block(FrameEnabled, "<FRAME_EN>"),
        block(ElementRef, "<ELEMENT_REF>"),
        block(Scrollbar, "<LISTBOXSLIDER_2>"),
    ],
    literals: &[Literal::ListItems],
};

static SPINNER: EmitPolicy = EmitPolicy {
    widget: WidgetType::Spinner,
    storage: Ram,
    primary: &[],
    default: "<SPINNER>",
    blocks: &[
        block(CustomArrows, "<SPINNER_ARROWS>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[Literal::SpinnerArrows],
};

static TEXTBOX: EmitPolicy = EmitPolicy {
    widget: WidgetType::TextBox,
    storage: Ram,
    primary: &[rule(&[Scrollbar], "<TEXTBOXSLIDER_1>")],
    default: "<TEXTBOX>",
    blocks: &[
        block(ElementRef, "<ELEMENT_REF>"),
        block(Scrollbar, "<TEXTBOXSLIDER_2>"),
    ],
    literals: &[],
};

static RINGGAUGE: EmitPolicy = EmitPolicy {
    widget: WidgetType::RingGauge,
    storage: Ram,
    primary: &[],
    default: "<RINGGAUGE>",
    blocks: &[
        block(RingLine, "<RINGGAUGE_LINE>"),
        block(RingSegments, "<RINGGAUGE_SEGMENTS>"),
        block(RingAngles, "<RINGGAUGE_RANGE>"),
        block(RingGradient, "<RINGGAUGE_GRADIENTCOL>"),
        block(RingFlatColor, "<RINGGAUGE_FLATCOL>"),
        block(RingInactiveColor, "<RINGGAUGE_INACTIVECOL>"),
        block(CustomTextColor, "<TEXT_COLOR>"),
        block(RingFillColor, "<COLOR_FILL>"),
        block(ElementRef, "<ELEMENT_REF>"),
    ],
    literals: &[],
};

/// Policy for a widget kind stored in `storage`.
pub fn policy_for(widget: WidgetType, storage: StorageMode) -> &'static EmitPolicy {
    match (widget, storage) {
        (WidgetType::Box, Flash) => &BOX_P,
        (WidgetType::Box, Ram) => &BOX,
        (WidgetType::Text, Flash) => &TEXT_P,
        (WidgetType::Text, Ram) => &TEXT,
        (WidgetType::TextButton, Flash) => &TXTBUTTON_P,
        (WidgetType::TextButton, Ram) => &TXTBUTTON,
        (WidgetType::CheckBox, Flash) => &CHECKBOX_P,
        (WidgetType::CheckBox, Ram) => &CHECKBOX,
        (WidgetType::RadioButton, Flash) => &RADIOBUTTON_P,
        (WidgetType::RadioButton, Ram) => &RADIOBUTTON,
        (WidgetType::ToggleButton, Flash) => &TOGGLEBUTTON_P,
        (WidgetType::ToggleButton, Ram) => &TOGGLEBUTTON,
        (WidgetType::ProgressBar, Flash) => &PROGRESSBAR_P,
        (WidgetType::ProgressBar, Ram) => &PROGRESSBAR,
        (WidgetType::Slider, Flash) => &SLIDER_P,
        (WidgetType::Slider, Ram) => &SLIDER,
        (WidgetType::Image, _) => &IMAGE,
        (WidgetType::ImgButton, _) => &IMGBUTTON,
        (WidgetType::Line, _) => &LINE,
        (WidgetType::ListBox, _) => &LISTBOX,
        (WidgetType::Spinner, _) => &SPINNER,
        (WidgetType::TextBox, _) => &TEXTBOX,
        (WidgetType::RingGauge, _) => &RINGGAUGE,
    }
}

/// Every distinct policy in the table.
pub fn all_policies() -> impl Iterator<Item = &'static EmitPolicy> {
    WidgetType::ALL.into_iter().flat_map(|ty| {
        let flash = ty.supports_flash().then(|| policy_for(ty, Flash));
        std::iter::once(policy_for(ty, Ram)).chain(flash)
    })
}
