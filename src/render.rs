use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, ValueFormatter};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use tracing::debug;

use crate::chart::{BarChart, Chart, Figure, LineChart, Orientation, PieChart, Renderer, Rgb, SKY_BLUE};
use crate::config::PlotConfig;
use crate::console::thousands;
use crate::error::{AnalysisError, Result};

type DrawResult<DB> = std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Renders figures to PNG files through plotters' bitmap backend.
pub struct BitmapRenderer {
    config: PlotConfig,
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Category axis: one equal slot per label, positions in slot units.
/// Key points sit on slot centres (`i + 0.5`).
#[derive(Debug, Clone, Copy)]
struct Slots(usize);

impl Slots {
    fn center(i: usize) -> f64 {
        i as f64 + 0.5
    }

    fn index_of(&self, value: f64) -> Option<usize> {
        let idx = value.floor();
        (idx >= 0.0 && (idx as usize) < self.0).then_some(idx as usize)
    }
}

impl Ranged for Slots {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let span = (limit.1 - limit.0) as f64;
        limit.0 + (span * value / self.0.max(1) as f64).round() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        (0..self.0).map(Slots::center).collect()
    }

    fn range(&self) -> Range<f64> {
        0.0..self.0 as f64
    }
}

impl ValueFormatter<f64> for Slots {
    fn format(_value: &f64) -> String {
        String::new()
    }
}

fn cycled(colors: &[Rgb], i: usize) -> Rgb {
    if colors.is_empty() {
        SKY_BLUE
    } else {
        colors[i % colors.len()]
    }
}

impl BitmapRenderer {
    pub fn new(config: PlotConfig) -> Self {
        BitmapRenderer { config }
    }

    fn font(&self, scale: f64, style: FontStyle) -> TextStyle<'static> {
        TextStyle::from(FontDesc::new(
            FontFamily::SansSerif,
            self.config.font_px() * scale,
            style,
        ))
    }

    fn background(&self) -> RGBColor {
        Rgb::from_hex(&self.config.style.background).map_or(WHITE, rgb)
    }

    fn grid_style(&self) -> ShapeStyle {
        BLACK.mix(self.config.style.grid_alpha * 0.5).stroke_width(1)
    }

    fn gap(&self) -> u32 {
        (self.config.font_px() * 0.6) as u32
    }

    /// Room below a bar chart for tick labels plus the axis description.
    fn x_label_area(&self, chart: &BarChart) -> u32 {
        let px = self.config.font_px();
        let ticks = if chart.rotate_labels { px * 7.0 } else { px * 2.0 };
        let desc = if chart.x_label.is_some() { px * 1.5 } else { 0.0 };
        (ticks + desc) as u32
    }

    fn draw_figure<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        figure: &Figure,
    ) -> DrawResult<DB> {
        root.fill(&self.background())?;
        let body = match &figure.title {
            Some(title) => root.titled(title, self.font(1.33, FontStyle::Bold))?,
            None => root.clone(),
        };
        let cells = body.split_evenly(figure.grid);
        for (chart, cell) in figure.panels.iter().zip(cells.iter()) {
            match chart {
                Chart::Bar(bar) if bar.bars.is_empty() => {
                    cell.titled(&bar.title, self.font(1.0, FontStyle::Bold))?;
                }
                Chart::Bar(bar) => match bar.orientation {
                    Orientation::Vertical => self.draw_vertical_bars(cell, bar)?,
                    Orientation::Horizontal => self.draw_horizontal_bars(cell, bar)?,
                },
                Chart::Pie(pie) => self.draw_pie(cell, pie)?,
                Chart::Line(line) => self.draw_line(cell, line)?,
            }
        }
        root.present()?;
        Ok(())
    }

    fn draw_vertical_bars<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        chart: &BarChart,
    ) -> DrawResult<DB> {
        let px = self.config.font_px();
        let slots = Slots(chart.bars.len());
        let top = ((chart.max_value() as f64) * 1.1).ceil() as u64 + 1;
        let label_font = self.font(0.8, FontStyle::Normal);

        let mut ctx = ChartBuilder::on(area)
            .caption(&chart.title, self.font(1.0, FontStyle::Bold))
            .margin((px / 2.0) as u32)
            .x_label_area_size(self.x_label_area(chart))
            .y_label_area_size((px * 3.0) as u32)
            .build_cartesian_2d(slots, 0u64..top)?;

        let category = |v: &f64| {
            slots
                .index_of(*v)
                .and_then(|i| chart.bars.get(i))
                .map(|(l, _)| l.clone())
                .unwrap_or_default()
        };
        let count = |v: &u64| thousands(*v);

        let mut mesh = ctx.configure_mesh();
        mesh.disable_x_mesh()
            .x_labels(chart.bars.len())
            .x_label_formatter(&category)
            .y_label_formatter(&count)
            .label_style(label_font.clone())
            .axis_desc_style(self.font(0.9, FontStyle::Bold));
        if chart.rotate_labels {
            mesh.x_label_style(label_font.clone().transform(FontTransform::Rotate90));
        }
        if chart.grid && self.config.style.grid {
            mesh.light_line_style(self.grid_style());
        } else {
            mesh.disable_y_mesh();
        }
        if let Some(desc) = &chart.x_label {
            mesh.x_desc(desc.as_str());
        }
        if let Some(desc) = &chart.y_label {
            mesh.y_desc(desc.as_str());
        }
        mesh.draw()?;

        let gap = self.gap();
        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, (_, v))| {
            let style = rgb(cycled(&chart.colors, i)).mix(chart.alpha).filled();
            let mut rect = Rectangle::new([(i as f64, 0u64), (i as f64 + 1.0, *v)], style);
            rect.set_margin(0, 0, gap, gap);
            rect
        }))?;

        if chart.annotate {
            let style = label_font.pos(Pos::new(HPos::Center, VPos::Bottom));
            ctx.draw_series(
                chart
                    .bars
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, v))| *v > 0)
                    .map(|(i, (_, v))| {
                        Text::new(thousands(*v), (Slots::center(i), *v), style.clone())
                    }),
            )?;
        }
        Ok(())
    }

    fn draw_horizontal_bars<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        chart: &BarChart,
    ) -> DrawResult<DB> {
        let px = self.config.font_px();
        let n = chart.bars.len();
        let slots = Slots(n);
        let right = ((chart.max_value() as f64) * 1.15).ceil() as u64 + 1;
        let label_font = self.font(0.8, FontStyle::Normal);
        // plotters puts row 0 at the bottom; the mapping is its own inverse
        let row_of = |i: usize| if chart.inverted { n - 1 - i } else { i };

        let mut ctx = ChartBuilder::on(area)
            .caption(&chart.title, self.font(1.0, FontStyle::Bold))
            .margin((px / 2.0) as u32)
            .x_label_area_size(self.x_label_area(chart))
            .y_label_area_size((px * 9.0) as u32)
            .build_cartesian_2d(0u64..right, slots)?;

        let category = |v: &f64| {
            slots
                .index_of(*v)
                .and_then(|row| chart.bars.get(row_of(row)))
                .map(|(l, _)| l.clone())
                .unwrap_or_default()
        };
        let count = |v: &u64| thousands(*v);

        let mut mesh = ctx.configure_mesh();
        mesh.disable_y_mesh()
            .y_labels(chart.bars.len())
            .y_label_formatter(&category)
            .x_label_formatter(&count)
            .label_style(label_font.clone())
            .axis_desc_style(self.font(0.9, FontStyle::Bold));
        if chart.grid && self.config.style.grid {
            mesh.light_line_style(self.grid_style());
        } else {
            mesh.disable_x_mesh();
        }
        if let Some(desc) = &chart.x_label {
            mesh.x_desc(desc.as_str());
        }
        if let Some(desc) = &chart.y_label {
            mesh.y_desc(desc.as_str());
        }
        mesh.draw()?;

        let gap = self.gap();
        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, (_, v))| {
            let row = row_of(i);
            let style = rgb(cycled(&chart.colors, i)).mix(chart.alpha).filled();
            let mut rect = Rectangle::new([(0u64, row as f64), (*v, row as f64 + 1.0)], style);
            rect.set_margin(gap, gap, 0, 0);
            rect
        }))?;

        if chart.annotate {
            let style = label_font.pos(Pos::new(HPos::Left, VPos::Center));
            ctx.draw_series(
                chart
                    .bars
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, v))| *v > 0)
                    .map(|(i, (_, v))| {
                        Text::new(format!(" {}", thousands(*v)), (*v, Slots::center(row_of(i))), style.clone())
                    }),
            )?;
        }
        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, chart: &PieChart) -> DrawResult<DB> {
        let body = area.titled(&chart.title, self.font(1.0, FontStyle::Bold))?;
        let total: u64 = chart.slices.iter().map(|(_, v)| *v).sum();
        if total == 0 {
            return Ok(());
        }

        // Pie takes backend pixels, not area-relative ones
        let (w, h) = body.dim_in_pixel();
        let (x0, y0) = body.get_base_pixel();
        let center = (x0 + (w / 2) as i32, y0 + (h / 2) as i32);
        let radius = w.min(h) as f64 * 0.35;
        let sizes: Vec<f64> = chart.slices.iter().map(|(_, v)| *v as f64).collect();
        let colors: Vec<RGBColor> = (0..sizes.len()).map(|i| rgb(cycled(&chart.colors, i))).collect();
        let labels: Vec<&str> = chart.slices.iter().map(|(l, _)| l.as_str()).collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        // plotters measures angles clockwise in screen space
        pie.start_angle(-chart.start_angle);
        pie.label_style(self.font(0.9, FontStyle::Normal));
        pie.percentages(self.font(0.8, FontStyle::Normal));
        body.draw(&pie)?;
        Ok(())
    }

    fn draw_line<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, chart: &LineChart) -> DrawResult<DB> {
        if chart.points.is_empty() {
            area.titled(&chart.title, self.font(1.0, FontStyle::Bold))?;
            return Ok(());
        }
        let px = self.config.font_px();
        let slots = Slots(chart.points.len());
        let max = chart.points.iter().map(|(_, v)| *v).max().unwrap_or(0);
        let min = chart.points.iter().map(|(_, v)| *v).min().unwrap_or(0);
        let low = ((min as f64) * 0.9).floor() as u64;
        let high = ((max as f64) * 1.1).ceil() as u64 + 1;

        let mut ctx = ChartBuilder::on(area)
            .caption(&chart.title, self.font(1.17, FontStyle::Bold))
            .margin((px / 2.0) as u32)
            .x_label_area_size((px * 2.5) as u32)
            .y_label_area_size((px * 3.0) as u32)
            .build_cartesian_2d(slots, low..high)?;

        let category = |v: &f64| {
            slots
                .index_of(*v)
                .and_then(|i| chart.points.get(i))
                .map(|(l, _)| l.clone())
                .unwrap_or_default()
        };

        let mut mesh = ctx.configure_mesh();
        mesh.x_labels(chart.points.len())
            .x_label_formatter(&category)
            .label_style(self.font(0.8, FontStyle::Normal))
            .axis_desc_style(self.font(0.9, FontStyle::Bold));
        if chart.grid && self.config.style.grid {
            mesh.light_line_style(self.grid_style());
        } else {
            mesh.disable_mesh();
        }
        if let Some(desc) = &chart.x_label {
            mesh.x_desc(desc.as_str());
        }
        if let Some(desc) = &chart.y_label {
            mesh.y_desc(desc.as_str());
        }
        mesh.draw()?;

        let color = rgb(chart.color);
        let data: Vec<(f64, u64)> = chart
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, v))| (Slots::center(i), *v))
            .collect();
        let stroke = (self.config.points_to_px(2.0)).max(1.0) as u32;
        ctx.draw_series(LineSeries::new(data.clone(), color.stroke_width(stroke)))?;
        if chart.markers {
            let radius = (self.config.points_to_px(3.0)).max(2.0) as u32;
            ctx.draw_series(data.into_iter().map(|p| Circle::new(p, radius, color.filled())))?;
        }
        Ok(())
    }
}

impl Renderer for BitmapRenderer {
    fn render(&self, figure: &Figure, out_dir: &Path) -> Result<PathBuf> {
        let path = out_dir.join(&figure.file_name);
        let size = self.config.pixels(figure.size);
        debug!(path = %path.display(), width = size.0, height = size.1, "rendering figure");
        {
            let root = BitMapBackend::new(&path, size).into_drawing_area();
            self.draw_figure(&root, figure)
                .map_err(|e| AnalysisError::Render {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FigureSize;

    const RED: Rgb = Rgb(0xFF, 0x00, 0x00);
    const BLUE: Rgb = Rgb(0x00, 0x00, 0xFF);

    struct Raster {
        buf: Vec<u8>,
        width: u32,
    }

    impl Raster {
        /// Draws `figure` into memory at 50 dpi, so a 10in figure is 500px.
        fn of(figure: &Figure) -> Raster {
            let renderer = BitmapRenderer::new(PlotConfig {
                dpi: 50,
                ..PlotConfig::default()
            });
            let (width, height) = renderer.config.pixels(figure.size);
            let mut buf = vec![0u8; (width * height * 3) as usize];
            {
                let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
                renderer.draw_figure(&root, figure).unwrap();
            }
            Raster { buf, width }
        }

        fn pixel(&self, x: u32, y: u32) -> Rgb {
            let i = ((y * self.width + x) * 3) as usize;
            Rgb(self.buf[i], self.buf[i + 1], self.buf[i + 2])
        }

        fn find(&self, color: Rgb) -> Vec<(u32, u32)> {
            self.buf
                .chunks_exact(3)
                .enumerate()
                .filter(|(_, px)| px[0] == color.0 && px[1] == color.1 && px[2] == color.2)
                .map(|(i, _)| (i as u32 % self.width, i as u32 / self.width))
                .collect()
        }
    }

    fn square(chart: Chart) -> Figure {
        Figure::single("teste.png", FigureSize::new(10.0, 10.0), chart)
    }

    fn bars(values: &[(&str, u64)]) -> Vec<(String, u64)> {
        values.iter().map(|(l, v)| (l.to_string(), *v)).collect()
    }

    #[test]
    fn pie_is_drawn_inside_its_own_cell() {
        let blank = || Chart::Bar(BarChart::new("vazio", Vec::new(), Orientation::Vertical));
        let pie = Chart::Pie(PieChart {
            title: "Estado Civil".to_string(),
            slices: bars(&[("CASADO", 3)]),
            colors: vec![RED],
            start_angle: 90.0,
        });
        let figure = Figure {
            file_name: "grade.png".to_string(),
            title: None,
            size: FigureSize::new(10.0, 10.0),
            grid: (2, 2),
            panels: vec![blank(), blank(), blank(), pie],
        };
        let raster = Raster::of(&figure);
        let red = raster.find(RED);
        assert!(red.len() > 1000, "pie missing: {} red pixels", red.len());
        assert!(red.iter().all(|&(x, y)| x >= 250 && y >= 250));
        assert_ne!(raster.pixel(125, 125), RED);
    }

    #[test]
    fn vertical_bars_fill_the_plot_width() {
        let mut chart = BarChart::new("UF", bars(&[("SP", 5), ("RJ", 5)]), Orientation::Vertical);
        chart.colors = vec![RED];
        chart.annotate = false;
        let raster = Raster::of(&square(Chart::Bar(chart)));
        let xs: Vec<u32> = raster.find(RED).iter().map(|&(x, _)| x).collect();
        let (min, max) = (*xs.iter().min().unwrap(), *xs.iter().max().unwrap());
        assert!(min < 60, "first bar starts at x={}", min);
        assert!(max > 450, "last bar ends at x={}", max);
    }

    #[test]
    fn inverted_horizontal_bars_put_the_first_entry_on_top() {
        let mut chart = BarChart::new("Palavras", bars(&[("escolas", 10), ("saude", 5)]), Orientation::Horizontal);
        chart.colors = vec![RED, BLUE];
        chart.annotate = false;
        chart.inverted = true;
        let raster = Raster::of(&square(Chart::Bar(chart)));
        let (red, blue) = (raster.find(RED), raster.find(BLUE));
        let top = |px: &[(u32, u32)]| px.iter().map(|&(_, y)| y).min().unwrap();
        let right = |px: &[(u32, u32)]| px.iter().map(|&(x, _)| x).max().unwrap();
        assert!(top(&red) < 100, "first row starts at y={}", top(&red));
        assert!(top(&red) < top(&blue));
        assert!(right(&red) > right(&blue));
    }

    #[test]
    fn line_reaches_the_last_category() {
        let points = bars(&[("Jan", 45), ("Fev", 78), ("Mar", 92), ("Abr", 65), ("Mai", 88), ("Jun", 72)]);
        let chart = LineChart {
            title: "Evolução".to_string(),
            x_label: None,
            y_label: None,
            points,
            color: BLUE,
            markers: true,
            grid: false,
        };
        let raster = Raster::of(&square(Chart::Line(chart)));
        let xs: Vec<u32> = raster.find(BLUE).iter().map(|&(x, _)| x).collect();
        assert!(*xs.iter().min().unwrap() < 90);
        assert!(*xs.iter().max().unwrap() > 425);
    }

    #[test]
    fn axis_description_gets_its_own_room() {
        let renderer = BitmapRenderer::new(PlotConfig::default());
        let mut chart = BarChart::new("UF", bars(&[("SP", 1)]), Orientation::Vertical);
        let bare = renderer.x_label_area(&chart);
        chart.x_label = Some("Estado".to_string());
        assert!(renderer.x_label_area(&chart) as f64 >= bare as f64 + renderer.config.font_px());
    }
}
