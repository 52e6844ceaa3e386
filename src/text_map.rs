use terrace_core::map::{MapWidget, MarkerKey, MarkerSpec, Viewport};

/// Terminal stand-in for a slippy map: keeps the current view and markers and prints them
/// as lines.
#[derive(Debug, Default)]
pub struct TextMap {
    viewport: Option<Viewport>,
    markers: Vec<MarkerSpec>,
    #[cfg(test)]
    rebuilds: usize,
}

impl TextMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times the marker layer was cleared and rebuilt.
    #[cfg(test)]
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.markers.len() + 1);
        if let Some(viewport) = &self.viewport {
            lines.push(format!("map @ {} zoom {}", viewport.center, viewport.zoom));
        }
        for marker in &self.markers {
            let glyph = if marker.selected { '*' } else { 'o' };
            let label = match marker.key {
                MarkerKey::Place(id) => format!("#{id}"),
                MarkerKey::Committed(index) => format!("[{index}]"),
                MarkerKey::Pending => "[new]".to_string(),
            };
            let mut line = format!("  {glyph} {label} {} ({})", marker.title, marker.position);
            if !marker.interactive {
                line.push_str(" (locked)");
            }
            if marker.opacity < 1.0 {
                line.push_str(" (dimmed)");
            }
            lines.push(line);
        }
        lines
    }
}

impl MapWidget for TextMap {
    fn create_view(&mut self, viewport: &Viewport) {
        self.viewport = Some(*viewport);
    }

    fn set_view(&mut self, viewport: &Viewport) {
        self.viewport = Some(*viewport);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
        #[cfg(test)]
        {
            self.rebuilds += 1;
        }
    }

    fn add_marker(&mut self, marker: &MarkerSpec) {
        self.markers.push(marker.clone());
    }
}
