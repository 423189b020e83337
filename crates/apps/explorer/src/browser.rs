//! Headless file manager model over the shared virtual file system.

use platform_host::{format_file_size, FsNode, SharedFileSystem, HOME_PATH};

const MODIFIED_DATES: [&str; 6] = [
    "Jan 15 1995",
    "Jan 10 1995",
    "Dec 28 1994",
    "Jan 03 1995",
    "Dec 15 1994",
    "Jan 08 1995",
];

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the directory listing.
pub struct EntryRow {
    /// Node name.
    pub name: String,
    /// Glyph chosen from the node kind and file extension.
    pub icon: &'static str,
    /// `<DIR>` for directories, a human size for non-empty files.
    pub size_label: String,
    /// Period-appropriate modification date.
    pub modified: &'static str,
    /// Whether activating the row navigates into it.
    pub is_directory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An opened file shown in the viewer overlay.
pub struct FileViewer {
    /// Header text, `name - size`.
    pub title: String,
    /// File content.
    pub content: String,
}

/// File manager state: the shared cursor plus selection, viewer, and status message.
pub struct FileBrowser {
    fs: SharedFileSystem,
    selected: Option<String>,
    viewer: Option<FileViewer>,
    message: Option<String>,
}

impl FileBrowser {
    /// Creates a browser over the shared file system without moving its cursor.
    pub fn new(fs: SharedFileSystem) -> Self {
        Self {
            fs,
            selected: None,
            viewer: None,
            message: None,
        }
    }

    /// Returns the location bar text.
    pub fn location(&self) -> String {
        format!("Location: {}", self.fs.borrow().current_path())
    }

    /// Lists the current directory in authored order.
    pub fn entries(&self) -> Vec<EntryRow> {
        self.fs
            .borrow()
            .list_directory()
            .iter()
            .map(entry_row)
            .collect()
    }

    /// Returns the selected entry name.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Returns the open file viewer.
    pub fn viewer(&self) -> Option<&FileViewer> {
        self.viewer.as_ref()
    }

    /// Returns the transient status message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Moves the cursor to the home directory.
    pub fn go_home(&mut self) {
        self.navigate(HOME_PATH);
    }

    /// Moves the cursor to the parent directory.
    pub fn go_up(&mut self) {
        self.navigate("..");
    }

    /// Clears selection and status so the listing is re-read.
    pub fn refresh(&mut self) {
        self.selected = None;
        self.message = None;
    }

    /// The tree is read-only, so folder creation only reports that.
    pub fn new_folder(&mut self) {
        self.message = Some("New Folder: Feature not implemented in demonstration".to_string());
    }

    /// Single-click selection.
    pub fn select(&mut self, name: &str) {
        self.selected = Some(name.to_string());
    }

    /// Double-click: enter a directory or open a file in the viewer.
    pub fn activate(&mut self, name: &str) {
        let is_directory = self
            .fs
            .borrow()
            .current_directory()
            .directory(name)
            .is_some();
        if is_directory {
            self.navigate(name);
            return;
        }

        let opened = self.fs.borrow().get_file(name).cloned();
        match opened {
            Some(file) if !file.content.is_empty() => {
                self.viewer = Some(FileViewer {
                    title: format!("{} - {}", file.name, format_file_size(file.size)),
                    content: file.content,
                });
            }
            _ => self.message = Some(format!("Cannot open {name}: No content available")),
        }
    }

    /// Closes the file viewer.
    pub fn close_viewer(&mut self) {
        self.viewer = None;
    }

    fn navigate(&mut self, path: &str) {
        let result = self.fs.borrow_mut().change_directory(path);
        self.selected = None;
        self.message = result.err().map(|err| err.to_string());
    }
}

fn entry_row(node: &FsNode) -> EntryRow {
    let size_label = match node {
        FsNode::Directory(_) => "<DIR>".to_string(),
        FsNode::File(file) if file.size > 0 => format_file_size(file.size),
        FsNode::File(_) => String::new(),
    };
    EntryRow {
        name: node.name().to_string(),
        icon: file_icon(node),
        size_label,
        modified: modified_date(node.name()),
        is_directory: matches!(node, FsNode::Directory(_)),
    }
}

fn file_icon(node: &FsNode) -> &'static str {
    if matches!(node, FsNode::Directory(_)) {
        return "📁";
    }
    let ext = node
        .name()
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "gif" | "bmp" | "xpm" => "🖼️",
        "wav" | "au" | "snd" => "🔊",
        "tar" | "gz" | "zip" => "📦",
        "c" | "h" | "cpp" => "📝",
        "sh" | "pl" | "py" => "⚙️",
        "conf" | "cfg" | "ini" => "🔧",
        _ => "📄",
    }
}

fn modified_date(name: &str) -> &'static str {
    let hash = name.bytes().fold(0usize, |acc, b| acc.wrapping_add(b as usize));
    MODIFIED_DATES[hash % MODIFIED_DATES.len()]
}

#[cfg(test)]
mod tests {
    use platform_host::VirtualFileSystem;
    use pretty_assertions::assert_eq;

    use super::*;

    fn browser_at_home() -> FileBrowser {
        let mut browser = FileBrowser::new(VirtualFileSystem::default().shared());
        browser.go_home();
        browser
    }

    #[test]
    fn home_listing_shows_dirs_and_sizes() {
        let browser = browser_at_home();
        assert_eq!(browser.location(), "Location: /home/user");
        let rows = browser.entries();
        let summary: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.name.as_str(), r.size_label.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Documents", "<DIR>"),
                ("Pictures", "<DIR>"),
                ("Downloads", "<DIR>"),
                ("readme.txt", "118 B"),
                ("todo.txt", "80 B"),
            ]
        );
        assert_eq!(rows[0].icon, "📁");
        assert_eq!(rows[3].icon, "📄");
    }

    #[test]
    fn activate_enters_directories_and_opens_files() {
        let mut browser = browser_at_home();
        browser.activate("todo.txt");
        let viewer = browser.viewer().expect("viewer");
        assert_eq!(viewer.title, "todo.txt - 80 B");
        browser.close_viewer();
        assert!(browser.viewer().is_none());

        browser.activate("Documents");
        assert_eq!(browser.location(), "Location: /home/user/Documents");
        assert!(browser.entries().is_empty());

        browser.go_up();
        browser.go_up();
        assert_eq!(browser.location(), "Location: /home");
    }

    #[test]
    fn new_folder_reports_read_only_tree() {
        let mut browser = browser_at_home();
        browser.select("todo.txt");
        browser.new_folder();
        assert_eq!(
            browser.message(),
            Some("New Folder: Feature not implemented in demonstration")
        );
        browser.refresh();
        assert_eq!(browser.message(), None);
        assert_eq!(browser.selected(), None);
    }

    #[test]
    fn icons_follow_extension() {
        let icon = |name: &str| file_icon(&FsNode::file(name, "x"));
        assert_eq!(icon("song.WAV"), "🔊");
        assert_eq!(icon("setup.sh"), "⚙️");
        assert_eq!(icon("README"), "📄");
    }
}
