//! Live UI Automation element source.
//!
//! [`UiaInspector`] is created once on the worker thread (after COM init)
//! and reused for the thread's lifetime: one `IUIAutomation` instance and
//! one control-view tree walker. The [`UiaNode`] values it hands out wrap a
//! live `IUIAutomationElement` for the duration of a single classification
//! pass; they are never cached -- the referenced window can vanish the
//! moment the user moves on.

use windows::Win32::Foundation::POINT;
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};
use windows::Win32::UI::Accessibility::{
    CUIAutomation, IUIAutomation, IUIAutomationElement, IUIAutomationTreeWalker,
    UIA_SelectionItemPatternId, UIA_AppBarControlTypeId, UIA_ButtonControlTypeId,
    UIA_CalendarControlTypeId, UIA_CheckBoxControlTypeId, UIA_ComboBoxControlTypeId,
    UIA_CustomControlTypeId, UIA_DataGridControlTypeId, UIA_DataItemControlTypeId,
    UIA_DocumentControlTypeId, UIA_EditControlTypeId, UIA_GroupControlTypeId,
    UIA_HeaderControlTypeId, UIA_HeaderItemControlTypeId, UIA_HyperlinkControlTypeId,
    UIA_ImageControlTypeId, UIA_ListControlTypeId, UIA_ListItemControlTypeId,
    UIA_MenuBarControlTypeId, UIA_MenuControlTypeId, UIA_MenuItemControlTypeId,
    UIA_PaneControlTypeId, UIA_ProgressBarControlTypeId, UIA_RadioButtonControlTypeId,
    UIA_ScrollBarControlTypeId, UIA_SemanticZoomControlTypeId, UIA_SeparatorControlTypeId,
    UIA_SliderControlTypeId, UIA_SpinnerControlTypeId, UIA_SplitButtonControlTypeId,
    UIA_StatusBarControlTypeId, UIA_TabControlTypeId, UIA_TabItemControlTypeId,
    UIA_TableControlTypeId, UIA_TextControlTypeId, UIA_ThumbControlTypeId,
    UIA_TitleBarControlTypeId, UIA_ToolBarControlTypeId, UIA_ToolTipControlTypeId,
    UIA_TreeControlTypeId, UIA_TreeItemControlTypeId, UIA_WindowControlTypeId,
    UIA_CONTROLTYPE_ID,
};

use crate::classify::UiNode;
use crate::dispatch::{Hit, PointInspector};
use crate::errors::UpclickError;
use crate::window;

/// Map a UIA control type ID to its conventional name.
pub fn control_type_name(id: UIA_CONTROLTYPE_ID) -> &'static str {
    match id {
        x if x == UIA_AppBarControlTypeId => "AppBar",
        x if x == UIA_ButtonControlTypeId => "Button",
        x if x == UIA_CalendarControlTypeId => "Calendar",
        x if x == UIA_CheckBoxControlTypeId => "CheckBox",
        x if x == UIA_ComboBoxControlTypeId => "ComboBox",
        x if x == UIA_CustomControlTypeId => "Custom",
        x if x == UIA_DataGridControlTypeId => "DataGrid",
        x if x == UIA_DataItemControlTypeId => "DataItem",
        x if x == UIA_DocumentControlTypeId => "Document",
        x if x == UIA_EditControlTypeId => "Edit",
        x if x == UIA_GroupControlTypeId => "Group",
        x if x == UIA_HeaderControlTypeId => "Header",
        x if x == UIA_HeaderItemControlTypeId => "HeaderItem",
        x if x == UIA_HyperlinkControlTypeId => "Hyperlink",
        x if x == UIA_ImageControlTypeId => "Image",
        x if x == UIA_ListControlTypeId => "List",
        x if x == UIA_ListItemControlTypeId => "ListItem",
        x if x == UIA_MenuBarControlTypeId => "MenuBar",
        x if x == UIA_MenuControlTypeId => "Menu",
        x if x == UIA_MenuItemControlTypeId => "MenuItem",
        x if x == UIA_PaneControlTypeId => "Pane",
        x if x == UIA_ProgressBarControlTypeId => "ProgressBar",
        x if x == UIA_RadioButtonControlTypeId => "RadioButton",
        x if x == UIA_ScrollBarControlTypeId => "ScrollBar",
        x if x == UIA_SemanticZoomControlTypeId => "SemanticZoom",
        x if x == UIA_SeparatorControlTypeId => "Separator",
        x if x == UIA_SliderControlTypeId => "Slider",
        x if x == UIA_SpinnerControlTypeId => "Spinner",
        x if x == UIA_SplitButtonControlTypeId => "SplitButton",
        x if x == UIA_StatusBarControlTypeId => "StatusBar",
        x if x == UIA_TabControlTypeId => "Tab",
        x if x == UIA_TabItemControlTypeId => "TabItem",
        x if x == UIA_TableControlTypeId => "Table",
        x if x == UIA_TextControlTypeId => "Text",
        x if x == UIA_ThumbControlTypeId => "Thumb",
        x if x == UIA_TitleBarControlTypeId => "TitleBar",
        x if x == UIA_ToolBarControlTypeId => "ToolBar",
        x if x == UIA_ToolTipControlTypeId => "ToolTip",
        x if x == UIA_TreeControlTypeId => "Tree",
        x if x == UIA_TreeItemControlTypeId => "TreeItem",
        x if x == UIA_WindowControlTypeId => "Window",
        _ => "Unknown",
    }
}

/// A live element plus the walker used to reach its parent. The walker
/// clone is an `AddRef`, not a new COM object.
pub struct UiaNode {
    element: IUIAutomationElement,
    walker: IUIAutomationTreeWalker,
}

impl UiNode for UiaNode {
    fn is_selectable(&self) -> bool {
        // GetCurrentPattern errors out when the pattern is unsupported, so
        // success alone is the capability signal.
        unsafe { self.element.GetCurrentPattern(UIA_SelectionItemPatternId) }.is_ok()
    }

    fn control_type(&self) -> &'static str {
        unsafe { self.element.CurrentControlType() }
            .map(control_type_name)
            .unwrap_or("Unknown")
    }

    fn name(&self) -> String {
        unsafe { self.element.CurrentName() }
            .map(|b| b.to_string())
            .unwrap_or_default()
    }

    fn parent(&self) -> Option<Self> {
        let parent = unsafe { self.walker.GetParentElement(&self.element) }.ok()?;
        Some(Self {
            element: parent,
            walker: self.walker.clone(),
        })
    }
}

/// Point-to-element resolution over a per-thread UIA instance.
///
/// COM must already be initialised on the constructing thread (see
/// [`crate::com::ComGuard`]), and the inspector must stay on that thread.
pub struct UiaInspector {
    uia: IUIAutomation,
    walker: IUIAutomationTreeWalker,
}

impl UiaInspector {
    pub fn new() -> Result<Self, UpclickError> {
        let uia: IUIAutomation =
            unsafe { CoCreateInstance(&CUIAutomation, None, CLSCTX_INPROC_SERVER)? };
        let walker = unsafe { uia.ControlViewWalker() }
            .map_err(|e| UpclickError::ComError(format!("ControlViewWalker: {e}")))?;
        Ok(Self { uia, walker })
    }
}

impl PointInspector for UiaInspector {
    type Node = UiaNode;

    fn hit_test(&mut self, x: i32, y: i32) -> Result<Option<Hit<UiaNode>>, UpclickError> {
        let point = POINT { x, y };
        let element = unsafe { self.uia.ElementFromPoint(point) }
            .map_err(|e| UpclickError::TreeError(format!("ElementFromPoint({x},{y}): {e}")))?;

        let Some(hwnd) = window::owning_window(&element, &self.walker) else {
            return Ok(None);
        };
        let window_class = window::top_level_class(hwnd);

        Ok(Some(Hit {
            node: UiaNode {
                element,
                walker: self.walker.clone(),
            },
            window_class,
        }))
    }
}
