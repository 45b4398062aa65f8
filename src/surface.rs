/// Mutable cells of a display row. Identifier and filename are set once at
/// creation and never change for the life of the download.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Status,
    Downloaded,
    Size,
    Rate,
}

/// Rendering surface for the downloads table.
///
/// Creating and removing rows are the only operations that change the row
/// set; everything else mutates cells in place. The reconciler calls
/// `flush` once at the end of each pass so implementations can repaint.
pub trait Surface {
    fn has_row(&self, id: i64) -> bool;
    fn create_row(&mut self, id: i64, filename: &str);
    fn set_cell(&mut self, id: i64, column: Column, text: &str);
    fn remove_row(&mut self, id: i64);
    fn set_visible(&mut self, visible: bool);
    fn flush(&mut self);
}

#[derive(Clone, Debug)]
struct Row {
    id: i64,
    filename: String,
    status: String,
    downloaded: String,
    size: String,
    rate: String,
}

/// Terminal table, repainted in full on every flush. Rows keep their
/// creation order, matching the server's snapshot order.
pub struct TermSurface {
    rows: Vec<Row>,
    visible: bool,
}

impl TermSurface {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            visible: false,
        }
    }

    fn row_mut(&mut self, id: i64) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    /// Render the table as text. `flush` prints this; tests inspect it.
    pub fn render(&self) -> String {
        if !self.visible {
            return "no downloads\n".to_string();
        }
        let mut out = format!(
            "{:>4}  {:<12} {:<28} {:>12} {:>12} {:>12}\n",
            "id", "status", "filename", "downloaded", "size", "rate"
        );
        for row in &self.rows {
            out.push_str(&format!(
                "{:>4}  {:<12} {:<28} {:>12} {:>12} {:>12}\n",
                row.id, row.status, row.filename, row.downloaded, row.size, row.rate
            ));
        }
        out
    }
}

impl Surface for TermSurface {
    fn has_row(&self, id: i64) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    fn create_row(&mut self, id: i64, filename: &str) {
        self.rows.push(Row {
            id,
            filename: filename.to_string(),
            status: String::new(),
            downloaded: String::new(),
            size: String::new(),
            rate: String::new(),
        });
    }

    fn set_cell(&mut self, id: i64, column: Column, text: &str) {
        if let Some(row) = self.row_mut(id) {
            let cell = match column {
                Column::Status => &mut row.status,
                Column::Downloaded => &mut row.downloaded,
                Column::Size => &mut row.size,
                Column::Rate => &mut row.rate,
            };
            *cell = text.to_string();
        }
    }

    fn remove_row(&mut self, id: i64) {
        self.rows.retain(|r| r.id != id);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn flush(&mut self) {
        print!("{}", self.render());
    }
}
