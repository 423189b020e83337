//! Desktop icons: grid layout, selection, and viewport-clamped dragging.

use desktop_app_contract::AppId;

use crate::apps::desktop_icon_apps;
use crate::model::{
    Bounds, Point, Size, ICON_COLUMN_STEP, ICON_GRID_ORIGIN, ICON_HEIGHT, ICON_ROW_STEP,
    ICON_WIDTH, PANEL_HEIGHT,
};

pub const TRASH_LABEL: &str = "Trash";
pub const TRASH_ICON: &str = "🗑️";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Something a desktop icon opens.
pub enum LaunchTarget {
    App(AppId),
    Trash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopIcon {
    pub target: LaunchTarget,
    pub label: String,
    pub icon: String,
    pub position: Point,
}

#[derive(Debug, Clone, Copy)]
struct IconDrag {
    target: LaunchTarget,
    pointer_offset: Point,
}

#[derive(Debug)]
pub struct DesktopIcons {
    icons: Vec<DesktopIcon>,
    selected: Option<LaunchTarget>,
    drag: Option<IconDrag>,
    viewport: Size,
}

impl DesktopIcons {
    /// Lays out catalog icons followed by the trash, top to bottom then left to right.
    pub fn new(viewport: Size) -> Self {
        let mut icons: Vec<DesktopIcon> = desktop_icon_apps()
            .into_iter()
            .map(|config| DesktopIcon {
                target: LaunchTarget::App(config.id),
                label: config.title,
                icon: config.icon,
                position: Point::default(),
            })
            .collect();
        icons.push(DesktopIcon {
            target: LaunchTarget::Trash,
            label: TRASH_LABEL.to_string(),
            icon: TRASH_ICON.to_string(),
            position: Point::default(),
        });

        let per_column = slots_per_column(viewport);
        for (slot, icon) in icons.iter_mut().enumerate() {
            icon.position = Point::new(
                ICON_GRID_ORIGIN.x + (slot / per_column) as i32 * ICON_COLUMN_STEP,
                ICON_GRID_ORIGIN.y + (slot % per_column) as i32 * ICON_ROW_STEP,
            );
        }

        Self {
            icons,
            selected: None,
            drag: None,
            viewport,
        }
    }

    pub fn icons(&self) -> &[DesktopIcon] {
        &self.icons
    }

    pub fn icon(&self, target: LaunchTarget) -> Option<&DesktopIcon> {
        self.icons.iter().find(|icon| icon.target == target)
    }

    pub fn selected(&self) -> Option<LaunchTarget> {
        self.selected
    }

    /// Selects an icon; `None` or an unknown target clears the selection.
    pub fn select(&mut self, target: Option<LaunchTarget>) {
        self.selected = target.filter(|target| self.icon(*target).is_some());
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Starts dragging `target`, remembering where on the icon the pointer grabbed it.
    pub fn begin_drag(&mut self, target: LaunchTarget, pointer: Point) {
        let Some(icon) = self.icon(target) else {
            return;
        };
        self.drag = Some(IconDrag {
            target,
            pointer_offset: pointer.offset_from(icon.position),
        });
        self.selected = Some(target);
    }

    /// Moves the dragged icon, keeping it above the panel and inside the viewport.
    pub fn update_drag(&mut self, pointer: Point) -> Option<Point> {
        let drag = self.drag?;
        let area = Bounds::desktop(self.viewport);
        let icon = self.icons.iter_mut().find(|icon| icon.target == drag.target)?;
        icon.position = area.clamp(
            pointer.offset_from(drag.pointer_offset),
            Size::new(ICON_WIDTH, ICON_HEIGHT),
        );
        Some(icon.position)
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

fn slots_per_column(viewport: Size) -> usize {
    let usable = viewport.height as i32 - PANEL_HEIGHT - ICON_GRID_ORIGIN.y;
    (usable / ICON_ROW_STEP).max(1) as usize
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const VIEWPORT: Size = Size::new(1024, 768);

    #[test]
    fn catalog_icons_then_trash_in_one_column() {
        let icons = DesktopIcons::new(VIEWPORT);
        let layout: Vec<(LaunchTarget, Point)> = icons
            .icons()
            .iter()
            .map(|icon| (icon.target, icon.position))
            .collect();
        assert_eq!(
            layout,
            vec![
                (LaunchTarget::App(AppId::Terminal), Point::new(16, 16)),
                (LaunchTarget::App(AppId::FileManager), Point::new(16, 104)),
                (LaunchTarget::App(AppId::TextEditor), Point::new(16, 192)),
                (LaunchTarget::App(AppId::Xcalc), Point::new(16, 280)),
                (LaunchTarget::App(AppId::Minesweeper), Point::new(16, 368)),
                (LaunchTarget::App(AppId::ImageViewer), Point::new(16, 456)),
                (LaunchTarget::App(AppId::Xeyes), Point::new(16, 544)),
                (LaunchTarget::Trash, Point::new(16, 632)),
            ]
        );
        assert_eq!(icons.icons()[7].label, "Trash");
    }

    #[test]
    fn short_viewports_wrap_into_columns() {
        let icons = DesktopIcons::new(Size::new(800, 300));
        assert_eq!(
            icons.icon(LaunchTarget::App(AppId::FileManager)).map(|i| i.position),
            Some(Point::new(16, 104))
        );
        assert_eq!(
            icons.icon(LaunchTarget::App(AppId::TextEditor)).map(|i| i.position),
            Some(Point::new(112, 16))
        );
    }

    #[test]
    fn drag_keeps_grab_offset_and_stays_above_panel() {
        let mut icons = DesktopIcons::new(VIEWPORT);
        let trash = LaunchTarget::Trash;

        icons.begin_drag(trash, Point::new(20, 460));
        assert_eq!(icons.selected(), Some(trash));
        assert_eq!(icons.update_drag(Point::new(304, 304)), Some(Point::new(300, 300)));
        assert_eq!(
            icons.update_drag(Point::new(5000, 5000)),
            Some(Point::new(1024 - 72, 768 - PANEL_HEIGHT - 80))
        );
        assert_eq!(icons.update_drag(Point::new(-50, -50)), Some(Point::new(0, 0)));

        icons.end_drag();
        assert!(!icons.is_dragging());
        assert_eq!(icons.update_drag(Point::new(10, 10)), None);
    }

    #[test]
    fn selection_ignores_unknown_targets() {
        let mut icons = DesktopIcons::new(VIEWPORT);
        icons.select(Some(LaunchTarget::App(AppId::Xcalc)));
        assert_eq!(icons.selected(), Some(LaunchTarget::App(AppId::Xcalc)));
        icons.select(None);
        assert_eq!(icons.selected(), None);
    }
}
