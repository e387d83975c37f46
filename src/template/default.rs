//! The built-in menu layout.
//!
//! Every tier shares one visual signature: a title bar 100 px tall, then the
//! content inside a thick outer frame with an accent square on its top-left
//! corner. Geometry below is in pixels.

use image::Rgba;
use tracing::debug;

use super::style::Style;
use super::{MenuTemplate, OverviewData, TemplateResources};
use crate::catalog::{CatalogEntry, DEFAULT_TEMPLATE, SubItem};
use crate::error::MenuError;
use crate::layout::{Align, Canvas, FrameStyle, Rect, TableLayout, TableOptions, draw_frame, layout_table};
use crate::raster::{RenderedImage, TRANSPARENT};
use crate::text::{self, FontFace, HorizontalAlign, WrapOptions};

/// Height of the title bar above the frame.
const TITLE_BAR_HEIGHT: u32 = 100;
/// Maximum height of an auto-sized title.
const TITLE_MAX_HEIGHT: u32 = 66;
/// Gap between a block's label and its text.
const LABEL_GAP: u32 = 10;

const OVERVIEW_DESCRIPTION_WRAP: u32 = 300;
const BRIEF_WRAP: u32 = 400;
const BRIEF_MIN_COLUMN: u32 = 400;
const MINIMAL_USAGE_WIDTH: u32 = 600;
const DETAIL_WIDTH: u32 = 800;
const DETAIL_TEXT_WIDTH: u32 = 680;
const DETAIL_ROW_GAP: u32 = 10;
const DETAIL_VALUE_GAP: u32 = 40;

/// Table-based layout driven by a [`Style`].
pub struct DefaultTemplate {
    name: String,
    style: Style,
    font: FontFace,
}

impl Default for DefaultTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultTemplate {
    pub fn new() -> Self {
        Self::with_style(DEFAULT_TEMPLATE, Style::default())
    }

    pub fn with_style(name: impl Into<String>, style: Style) -> Self {
        Self {
            name: name.into(),
            style,
            font: FontFace::default(),
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    fn ink(&self) -> Rgba<u8> {
        self.style.palette.primary()
    }

    fn background(&self) -> Rgba<u8> {
        self.style.palette.background()
    }

    fn line(&self, text: &str) -> RenderedImage {
        text::render_line(text, &self.font, self.style.font_size, self.ink())
    }

    fn wrapped(&self, text: &str, options: &WrapOptions) -> RenderedImage {
        text::layout_wrapped(text, &self.font, self.style.font_size, self.ink(), options)
    }

    fn title(&self, text: &str, max_width: u32) -> RenderedImage {
        text::auto_resize_text(
            text,
            self.style.title_size,
            &self.font,
            (max_width, TITLE_MAX_HEIGHT),
            self.ink(),
        )
    }

    fn frame(&self) -> FrameStyle {
        FrameStyle::new(self.ink(), self.style.palette.accent())
    }

    /// Label on the left, text block beside it, on a transparent background.
    fn labelled(&self, label: &RenderedImage, body: &RenderedImage) -> RenderedImage {
        let width = label.width() + LABEL_GAP + body.width();
        let height = label.height().max(body.height());
        let mut block = Canvas::new(width, height, TRANSPARENT);
        block.composite(label, (0, 0), true);
        block.composite(body, ((label.width() + LABEL_GAP) as i32, 0), true);
        block.into_image()
    }

    /// Title centred in the bar across the top of `canvas`.
    fn place_title(&self, canvas: &mut Canvas, title: &RenderedImage) -> Result<(), MenuError> {
        let width = canvas.size().0;
        canvas.define_box("title_box", (0, 0), (width, TITLE_BAR_HEIGHT));
        let position = canvas.align_box("title_box", title.size(), Align::Center)?;
        canvas.composite(title, position, true);
        Ok(())
    }
}

/// Text present and non-empty.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Text of a table before rendering: header labels, data rows, and the wrap
/// width of each column (`None` renders the cell as a single line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableText {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub wrap: Vec<Option<u32>>,
    pub min_widths: Vec<u32>,
}

impl TableText {
    fn new() -> Self {
        Self {
            header: Vec::new(),
            rows: Vec::new(),
            wrap: Vec::new(),
            min_widths: Vec::new(),
        }
    }

    fn column(&mut self, label: &str, wrap: Option<u32>, min_width: u32) {
        self.header.push(label.to_string());
        self.wrap.push(wrap);
        self.min_widths.push(min_width);
    }
}

impl DefaultTemplate {
    /// The overview table: index, name and description of every row.
    pub fn overview_grid(&self, data: &OverviewData<'_>) -> TableText {
        let labels = &self.style.labels;
        let mut grid = TableText::new();
        grid.column(&labels.index_header, None, 0);
        grid.column(&labels.name_header, None, 0);
        grid.column(&labels.description_header, Some(OVERVIEW_DESCRIPTION_WRAP), 0);
        grid.rows = data
            .rows(labels)
            .into_iter()
            .enumerate()
            .map(|(i, (name, description))| vec![(i + 1).to_string(), name, description.to_string()])
            .collect();
        grid
    }

    /// The entry table. The trigger method and brief columns are present
    /// only when at least one sub-item fills them.
    pub fn entry_grid(&self, entry: &CatalogEntry) -> TableText {
        let labels = &self.style.labels;
        let items = entry.sub_items().unwrap_or(&[]);
        let has_method = items.iter().any(|i| present(i.trigger_method()).is_some());
        let has_brief = items.iter().any(|i| present(i.brief_description()).is_some());

        let mut grid = TableText::new();
        grid.column(&labels.index_header, None, 0);
        grid.column(&labels.function_header, None, 0);
        if has_method {
            grid.column(&labels.trigger_method_header, None, 0);
        }
        grid.column(&labels.trigger_condition_header, None, 0);
        if has_brief {
            grid.column(&labels.brief_header, Some(BRIEF_WRAP), BRIEF_MIN_COLUMN);
        }

        grid.rows = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mut row = vec![(i + 1).to_string(), item.label().to_string()];
                if has_method {
                    row.push(item.trigger_method().unwrap_or("").to_string());
                }
                row.push(item.trigger_condition().to_string());
                if has_brief {
                    row.push(item.brief_description().unwrap_or("").to_string());
                }
                row
            })
            .collect();
        grid
    }

    fn draw_grid(&self, grid: &TableText) -> Result<TableLayout, MenuError> {
        let cell = |column: usize, text: &str| match grid.wrap[column] {
            Some(width) => self.wrapped(text, &WrapOptions::new(width)),
            None => self.line(text),
        };
        let header: Vec<RenderedImage> = grid.header.iter().map(|h| self.line(h)).collect();
        let rows: Vec<Vec<RenderedImage>> = grid
            .rows
            .iter()
            .map(|row| row.iter().enumerate().map(|(c, text)| cell(c, text)).collect())
            .collect();

        let mut options = TableOptions::new(self.ink(), self.background());
        for (column, width) in grid.min_widths.iter().enumerate() {
            if *width > 0 {
                options = options.min_column_width(column, *width);
            }
        }
        Ok(layout_table(&header, &rows, &options)?)
    }
}

impl MenuTemplate for DefaultTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&mut self, resources: &TemplateResources) -> Result<(), MenuError> {
        self.font = match &self.style.font {
            Some(path) => FontFace::from_file(path)?,
            None => resources.font.clone(),
        };
        debug!(template = %self.name, font = ?self.font, "template prepared");
        Ok(())
    }

    fn render_overview(&self, data: &OverviewData<'_>) -> Result<RenderedImage, MenuError> {
        let grid = self.overview_grid(data);
        debug!(template = %self.name, rows = grid.rows.len(), "rendering overview");
        let labels = &self.style.labels;

        let table = self.draw_grid(&grid)?;
        let (tw, th) = table.image.size();

        let note_label = self.line(&labels.note_label);
        let note_width = tw.saturating_sub(30 + note_label.width() + LABEL_GAP).max(1);
        let note_text = self.wrapped(
            &labels.note,
            &WrapOptions::new(note_width).spacing(4).align(HorizontalAlign::Center),
        );
        let note = self.labelled(&note_label, &note_text);
        let nh = note.height();

        let mut canvas = Canvas::new(tw + 140, th + nh + 210, self.background());
        let page = canvas.bounds();

        // Note left-aligned with the table
        let note_pos = page.align(table.image.size(), Align::Horizontal { y: 140 });
        canvas.composite(&note, note_pos, true);
        let table_pos = page.align(table.image.size(), Align::Horizontal { y: (160 + nh) as i32 });
        canvas.composite(&table.image, table_pos, false);

        let border_size = (tw + 40, th + nh + 90);
        let border = Rect::new(page.align(border_size, Align::Horizontal { y: 100 }), border_size);
        draw_frame(&mut canvas, "border_box", border, &self.frame())?;

        let title = self.title(&labels.overview_title, tw.saturating_sub(60));
        self.place_title(&mut canvas, &title)?;
        Ok(canvas.into_image())
    }

    fn render_entry(&self, entry: &CatalogEntry) -> Result<RenderedImage, MenuError> {
        let labels = &self.style.labels;
        let grid = self.entry_grid(entry);
        debug!(
            template = %self.name,
            entry = entry.name(),
            rows = grid.rows.len(),
            columns = grid.header.len(),
            "rendering entry"
        );

        let table = self.draw_grid(&grid)?;
        let (tw, th) = table.image.size();

        let usage = present(entry.usage()).map(|usage| {
            let label = self.line(&labels.usage_label);
            let width = tw.saturating_sub(30 + label.width() + LABEL_GAP).max(1);
            let body = self.wrapped(usage, &WrapOptions::new(width).spacing(10));
            self.labelled(&label, &body)
        });
        let uh = usage.as_ref().map_or(0, RenderedImage::height);

        let mut canvas = Canvas::new(tw + 140, th + uh + 210, self.background());
        let page = canvas.bounds();

        let table_y = match &usage {
            Some(block) => {
                let position = page.align(block.size(), Align::Horizontal { y: 130 });
                canvas.composite(block, position, true);
                130 + uh + 20
            }
            None => 130,
        };
        let table_pos = page.align(table.image.size(), Align::Horizontal { y: table_y as i32 });
        canvas.composite(&table.image, table_pos, false);

        let border_size = (tw + 40, th + uh + 70);
        let border = Rect::new(page.align(border_size, Align::Horizontal { y: 100 }), border_size);
        draw_frame(&mut canvas, "border_box", border, &self.frame())?;

        let title = self.title(entry.name(), tw.saturating_sub(60));
        self.place_title(&mut canvas, &title)?;
        Ok(canvas.into_image())
    }

    fn render_entry_minimal(&self, entry: &CatalogEntry) -> Result<RenderedImage, MenuError> {
        debug!(template = %self.name, entry = entry.name(), "rendering minimal entry");
        let usage = present(entry.usage()).map(|usage| {
            let label = self.line(&self.style.labels.usage_label);
            let body = self.wrapped(usage, &WrapOptions::new(MINIMAL_USAGE_WIDTH).spacing(10));
            self.labelled(&label, &body)
        });
        let (uw, uh) = usage.as_ref().map_or((0, 0), RenderedImage::size);
        let inner = uw.max(MINIMAL_USAGE_WIDTH);

        let mut canvas = Canvas::new(inner + 140, uh + 210, self.background());
        let page = canvas.bounds();

        let border_size = (inner + 60, uh + 70);
        let border = Rect::new(page.align(border_size, Align::Horizontal { y: 100 }), border_size);
        if let Some(block) = &usage {
            canvas.composite(block, border.align(block.size(), Align::Center), true);
        }
        draw_frame(&mut canvas, "border_box", border, &self.frame())?;

        let title = self.title(entry.name(), inner - 40);
        self.place_title(&mut canvas, &title)?;
        Ok(canvas.into_image())
    }

    fn render_sub_item(&self, item: &SubItem) -> Result<RenderedImage, MenuError> {
        let labels = &self.style.labels;
        debug!(template = %self.name, item = item.label(), "rendering sub-item");

        let function = (labels.function_label.as_str(), item.label());
        let condition = (labels.trigger_condition_label.as_str(), item.trigger_condition());
        let mut fields = vec![Some(function)];
        fields.push(present(item.trigger_method()).map(|m| (labels.trigger_method_label.as_str(), m)));
        fields.push(Some(condition));
        fields.push(present(item.detail_description()).map(|d| (labels.detail_label.as_str(), d)));
        let mut fields: Vec<(&str, &str)> = fields.into_iter().flatten().collect();
        if fields.len() < 2 {
            fields = vec![function, condition];
        }

        let label_images: Vec<RenderedImage> = fields.iter().map(|(label, _)| self.line(label)).collect();
        let gutter = label_images.iter().map(RenderedImage::width).max().unwrap_or(0);
        let value_options = WrapOptions::new(DETAIL_TEXT_WIDTH.saturating_sub(gutter).max(1))
            .spacing(5)
            .ignore_border(false, true);
        let value_images: Vec<RenderedImage> = fields
            .iter()
            .map(|(_, value)| self.wrapped(value, &value_options))
            .collect();

        let row_heights: Vec<u32> = label_images
            .iter()
            .zip(&value_images)
            .map(|(l, v)| l.height().max(v.height()))
            .collect();
        let text_width = gutter + DETAIL_VALUE_GAP + value_images.iter().map(RenderedImage::width).max().unwrap_or(0);
        let text_height =
            row_heights.iter().sum::<u32>() + DETAIL_ROW_GAP * (row_heights.len() as u32).saturating_sub(1);

        let mut text = Canvas::new(text_width, text_height, TRANSPARENT);
        let mut top = 0i32;
        for (i, ((label, value), height)) in label_images.iter().zip(&value_images).zip(&row_heights).enumerate() {
            let name = format!("item_{}_box", i);
            let row = text.define_box(name.as_str(), (0, top), (DETAIL_TEXT_WIDTH, *height));
            let label_pos = text.align_box(&name, label.size(), Align::At { x: row.left(), y: row.top() })?;
            text.composite(label, label_pos, true);
            let value_pos = text.align_box(
                &name,
                value.size(),
                Align::At {
                    x: (gutter + DETAIL_VALUE_GAP) as i32,
                    y: row.top(),
                },
            )?;
            text.composite(value, value_pos, true);
            top = row.bottom() + DETAIL_ROW_GAP as i32;
        }
        let text = text.into_image();

        let mut canvas = Canvas::new(DETAIL_WIDTH, text.height() + 120, self.background());
        canvas.define_box("text_border_box", (20, 100), (DETAIL_WIDTH - 40, text.height() + 20));
        canvas.outline_box("text_border_box", self.ink(), 1)?;
        let text_pos = canvas.align_box("text_border_box", text.size(), Align::Center)?;
        canvas.composite(&text, text_pos, true);

        canvas.define_box("upper_box", (0, 0), (DETAIL_WIDTH, TITLE_BAR_HEIGHT));
        let bar_size = (DETAIL_WIDTH - 100, 20);
        let bar = Rect::new(canvas.align_box("upper_box", bar_size, Align::Center)?, bar_size);
        draw_frame(&mut canvas, "bar_box", bar, &self.frame().accent_offset(25, 15))?;
        Ok(canvas.into_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntryBuilder;
    use pretty_assertions::assert_eq;

    fn template() -> DefaultTemplate {
        let mut t = DefaultTemplate::new();
        t.prepare(&TemplateResources::default()).unwrap();
        t
    }

    fn weather() -> CatalogEntry {
        EntryBuilder::new("Weather", "Forecasts")
            .usage("weather <city>")
            .sub_items(vec![
                SubItem::new("today", "weather today").with_brief_description("Today's forecast for a city"),
                SubItem::new("week", "weather week"),
            ])
            .build()
    }

    fn headers(grid: &TableText) -> Vec<&str> {
        grid.header.iter().map(String::as_str).collect()
    }

    #[test]
    fn overview_grid_has_index_name_description() {
        let t = template();
        let data = OverviewData {
            names: vec!["AlphaTool", "BetaTool"],
            descriptions: vec!["first tool", "second tool"],
        };
        let grid = t.overview_grid(&data);
        assert_eq!(headers(&grid), vec!["#", "Name", "Description"]);
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.rows[0], vec!["1", "AlphaTool", "first tool"]);
        assert_eq!(grid.rows[1], vec!["2", "BetaTool", "second tool"]);
    }

    #[test]
    fn entry_grid_without_optional_fields() {
        let entry = EntryBuilder::new("Plain", "p")
            .sub_items(vec![SubItem::new("start", "plain start"), SubItem::new("stop", "plain stop")])
            .build();
        let grid = template().entry_grid(&entry);
        assert_eq!(headers(&grid), vec!["#", "Function", "Trigger Condition"]);
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.rows[1], vec!["2", "stop", "plain stop"]);
        assert_eq!(grid.min_widths, vec![0, 0, 0]);
    }

    #[test]
    fn entry_grid_adds_method_column_when_any_row_has_one() {
        let entry = EntryBuilder::new("Methods", "m")
            .sub_items(vec![
                SubItem::new("start", "m start"),
                SubItem::new("stop", "m stop").with_trigger_method("command"),
            ])
            .build();
        let grid = template().entry_grid(&entry);
        assert_eq!(headers(&grid), vec!["#", "Function", "Trigger Method", "Trigger Condition"]);
        assert_eq!(grid.rows[0], vec!["1", "start", "", "m start"]);
        assert_eq!(grid.rows[1], vec!["2", "stop", "command", "m stop"]);
    }

    #[test]
    fn entry_grid_adds_brief_column_when_any_row_has_one() {
        let grid = template().entry_grid(&weather());
        assert_eq!(headers(&grid), vec!["#", "Function", "Trigger Condition", "Brief"]);
        assert_eq!(grid.rows[0][3], "Today's forecast for a city");
        assert_eq!(grid.rows[1][3], "");
        assert_eq!(grid.wrap[3], Some(BRIEF_WRAP));
        assert_eq!(grid.min_widths[3], BRIEF_MIN_COLUMN);
    }

    #[test]
    fn empty_method_does_not_add_a_column() {
        let entry = EntryBuilder::new("Blank", "b")
            .sub_items(vec![SubItem::new("start", "b start").with_trigger_method("")])
            .build();
        let grid = template().entry_grid(&entry);
        assert_eq!(headers(&grid), vec!["#", "Function", "Trigger Condition"]);
    }

    #[test]
    fn overview_canvas_wraps_table_and_note() {
        let t = template();
        let data = OverviewData {
            names: vec!["AlphaTool", "BetaTool"],
            descriptions: vec!["first tool", "second tool"],
        };
        let img = t.render_overview(&data).unwrap();
        assert!(img.width() > 140);
        assert!(img.height() > 210);
        // Accent square sits 25 px in from the left edge of a 50 px margin
        assert_eq!(img.pixel(25, 75), Some(t.style().palette.accent()));
    }

    #[test]
    fn empty_overview_still_renders() {
        let img = template().render_overview(&OverviewData::default()).unwrap();
        assert!(img.width() > 0 && img.height() > 0);
    }

    #[test]
    fn usage_block_grows_entry_canvas() {
        let t = template();
        let with_usage = t.render_entry(&weather()).unwrap();
        let without = EntryBuilder::new("Weather", "Forecasts")
            .sub_items(weather().sub_items().unwrap().to_vec())
            .build();
        let without = t.render_entry(&without).unwrap();
        assert_eq!(with_usage.width(), without.width());
        assert!(with_usage.height() > without.height());
    }

    #[test]
    fn brief_column_is_at_least_minimum_width() {
        let t = template();
        let brief = t.render_entry(&weather()).unwrap();
        let plain = EntryBuilder::new("Weather", "Forecasts")
            .sub_items(vec![SubItem::new("today", "weather today"), SubItem::new("week", "weather week")])
            .build();
        let plain = t.render_entry(&plain).unwrap();
        assert!(brief.width() >= plain.width() + BRIEF_MIN_COLUMN);
    }

    #[test]
    fn minimal_tier_without_usage_is_a_bare_frame() {
        let t = template();
        let entry = EntryBuilder::new("Bare", "nothing else").build();
        let img = t.render_entry_minimal(&entry).unwrap();
        assert_eq!(img.size(), (MINIMAL_USAGE_WIDTH + 140, 210));
    }

    #[test]
    fn minimal_tier_with_usage_grows() {
        let t = template();
        let entry = EntryBuilder::new("Echo", "repeats").usage("echo <text>\nrepeats the text").build();
        let img = t.render_entry_minimal(&entry).unwrap();
        assert_eq!(img.width(), MINIMAL_USAGE_WIDTH + 140);
        assert!(img.height() > 210);
    }

    #[test]
    fn sub_item_detail_is_fixed_width() {
        let t = template();
        let short = t.render_sub_item(&SubItem::new("today", "weather today")).unwrap();
        let long = t
            .render_sub_item(
                &SubItem::new("today", "weather today")
                    .with_trigger_method("command")
                    .with_detail_description("Shows the forecast for the configured city. ".repeat(5)),
            )
            .unwrap();
        assert_eq!(short.width(), DETAIL_WIDTH);
        assert_eq!(long.width(), DETAIL_WIDTH);
        assert!(long.height() > short.height());
    }
}
