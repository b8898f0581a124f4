//! Colored terminal output.
//!
//! Same layout as the outline, but every folder line is painted with the
//! folder's own background and a contrasting foreground.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, PrintStyledContent, StyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};

use super::outline::{FolderLine, lines};
use crate::types::{RenderNode, Rgba};

fn to_color(color: Rgba) -> Color {
    Color::Rgb { r: color.r, g: color.g, b: color.b }
}

fn styled(line: &FolderLine<'_>) -> StyledContent<String> {
    let caption = format!(" {} ", line.caption());
    match &line.folder.style {
        Some(style) => caption
            .with(to_color(style.foreground()))
            .on(to_color(style.background)),
        None => caption.stylize(),
    }
}

/// The tree as ANSI-colored lines joined with `\n`.
pub fn paint(tree: &RenderNode) -> String {
    lines(tree)
        .iter()
        .map(|line| format!("{}{}", "  ".repeat(line.depth), styled(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clear the screen and draw the tree from the top-left corner.
pub fn draw(out: &mut impl Write, tree: &RenderNode) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    for (row, line) in lines(tree).iter().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        let column = u16::try_from(line.depth * 2).unwrap_or(u16::MAX);
        queue!(out, MoveTo(column, row), PrintStyledContent(styled(line)))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Scope;
    use crate::folder::{ViewProps, view};
    use crate::types::NodeId;

    fn tree() -> RenderNode {
        view(
            &ViewProps {
                scope: Scope::root(&NodeId::from("root")),
                removable: false,
                color: Rgba::rgb(0x10, 0x20, 0x30),
            },
            Vec::new(),
        )
    }

    #[test]
    fn test_paint_uses_folder_background() {
        let painted = paint(&tree());
        assert!(painted.contains("root #102030 [Add Folder]"), "caption kept: {painted:?}");
        assert_eq!(painted.lines().count(), 1);
    }

    #[test]
    fn test_draw_writes_to_buffer() {
        let mut buffer: Vec<u8> = Vec::new();
        draw(&mut buffer, &tree()).unwrap();
        let written = String::from_utf8(buffer).unwrap();
        assert!(written.contains("root #102030"));
    }
}
