use tracing::trace;

use crate::error::RenderError;

use super::canvas::Canvas;
use super::layout::{
    AUTHOR_COLOR, AUTHOR_FONT, AUTHOR_ORIGIN, BACKGROUND_BOTTOM, BACKGROUND_TOP,
    BATTERY_STROKE_WIDTH, CARRIER_FONT, CARRIER_Y, MESSAGE_COLOR, MESSAGE_FONT, MESSAGE_MAX_WIDTH,
    MESSAGE_ORIGIN, Rect, SUBTITLE_COLOR, SUBTITLE_FONT, SUBTITLE_ORIGIN, TIME_FONT, TIME_ORIGIN,
    WHITE, battery_glyph, centered_x, message_line_y, signal_bars, wrap_words,
};
use super::request::RenderRequest;

/// Paints the whole card. Later calls composite over earlier ones, so the
/// order below is the layering order.
pub fn paint_card<C: Canvas + ?Sized>(
    canvas: &mut C,
    request: &RenderRequest,
) -> Result<(), RenderError> {
    canvas.fill_vertical_gradient(Rect::canvas(), BACKGROUND_TOP, BACKGROUND_BOTTOM)?;

    paint_status_bar(canvas, request)?;

    canvas.fill_text(
        &request.author,
        AUTHOR_ORIGIN.0,
        AUTHOR_ORIGIN.1,
        AUTHOR_FONT,
        AUTHOR_COLOR,
    )?;
    if request.has_subtitle() {
        canvas.fill_text(
            &request.subtitle,
            SUBTITLE_ORIGIN.0,
            SUBTITLE_ORIGIN.1,
            SUBTITLE_FONT,
            SUBTITLE_COLOR,
        )?;
    }

    paint_message(canvas, &request.message_text)
}

fn paint_status_bar<C: Canvas + ?Sized>(
    canvas: &mut C,
    request: &RenderRequest,
) -> Result<(), RenderError> {
    canvas.fill_text(&request.time, TIME_ORIGIN.0, TIME_ORIGIN.1, TIME_FONT, WHITE)?;

    let carrier_width = canvas.measure_text(&request.carrier_name, CARRIER_FONT)?;
    canvas.fill_text(
        &request.carrier_name,
        centered_x(carrier_width),
        CARRIER_Y,
        CARRIER_FONT,
        WHITE,
    )?;

    for bar in signal_bars(request.signal_strength) {
        canvas.fill_rect(bar.rect, bar.color)?;
    }

    let battery = battery_glyph(request.battery_percentage);
    canvas.stroke_rect(battery.outline, WHITE, BATTERY_STROKE_WIDTH)?;
    canvas.fill_rect(battery.fill, battery.fill_color)?;
    canvas.fill_rect(battery.nub, WHITE)
}

fn paint_message<C: Canvas + ?Sized>(canvas: &mut C, text: &str) -> Result<(), RenderError> {
    let lines = wrap_words(text, MESSAGE_MAX_WIDTH, |candidate| {
        canvas.measure_text(candidate, MESSAGE_FONT)
    })?;
    trace!(line_count = lines.len(), "wrapped message body");

    for (index, line) in lines.iter().enumerate() {
        canvas.fill_text(
            line,
            MESSAGE_ORIGIN.0,
            message_line_y(index),
            MESSAGE_FONT,
            MESSAGE_COLOR,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::card::layout::{
        AUTHOR_FONT, BACKGROUND_BOTTOM, BACKGROUND_TOP, BATTERY_LOW, BATTERY_OK, CARRIER_FONT,
        DIM_WHITE, MESSAGE_FONT, Rect, SUBTITLE_FONT, TIME_FONT, WHITE,
    };
    use crate::card::request::RenderRequest;
    use crate::test_support::{DrawCall, RecordingCanvas};

    use super::paint_card;

    fn paint(request: &RenderRequest) -> Vec<DrawCall> {
        let mut canvas = RecordingCanvas::new(10.0);
        paint_card(&mut canvas, request).unwrap();
        canvas.into_calls()
    }

    fn texts(calls: &[DrawCall]) -> Vec<(&str, f32, f32)> {
        calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, x, y, .. } => Some((text.as_str(), *x, *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn draw_sequence_is_layered_in_order() {
        let request = RenderRequest {
            subtitle: "Builder".to_owned(),
            ..RenderRequest::default()
        };
        let calls = paint(&request);

        assert_eq!(
            calls[0],
            DrawCall::Gradient {
                rect: Rect::new(0.0, 0.0, 1024.0, 1024.0),
                top: BACKGROUND_TOP,
                bottom: BACKGROUND_BOTTOM,
            }
        );
        let fonts = calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { font, .. } => Some(*font),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            fonts,
            vec![
                TIME_FONT,
                CARRIER_FONT,
                AUTHOR_FONT,
                SUBTITLE_FONT,
                MESSAGE_FONT
            ]
        );

        let rect_count = calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Rect { .. }))
            .count();
        assert_eq!(rect_count, 5 + 2);
        assert!(matches!(calls[8], DrawCall::StrokeRect { width, .. } if width == 2.0));
    }

    #[test]
    fn status_bar_text_positions() {
        let request = RenderRequest {
            carrier_name: "ABCD".to_owned(),
            ..RenderRequest::default()
        };
        let calls = paint(&request);
        let texts = texts(&calls);

        assert_eq!(texts[0], ("11:26", 40.0, 40.0));
        // Four glyphs at 10 units each, centered on x=512.
        assert_eq!(texts[1], ("ABCD", 492.0, 44.0));
        assert_eq!(texts[2], ("Unknown", 60.0, 150.0));
    }

    #[test]
    fn empty_subtitle_is_not_drawn() {
        let calls = paint(&RenderRequest::default());
        assert!(
            calls
                .iter()
                .all(|call| !matches!(call, DrawCall::Text { font, .. } if *font == SUBTITLE_FONT))
        );

        let with_subtitle = paint(&RenderRequest {
            subtitle: "Staff".to_owned(),
            ..RenderRequest::default()
        });
        assert!(texts(&with_subtitle).contains(&("Staff", 60.0, 190.0)));
    }

    #[test]
    fn signal_and_battery_colors_follow_request() {
        let request = RenderRequest {
            signal_strength: 2,
            battery_percentage: 14,
            ..RenderRequest::default()
        };
        let calls = paint(&request);
        let fills = calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Rect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect::<Vec<_>>();

        let bar_colors = fills[..5].iter().map(|(_, color)| *color).collect::<Vec<_>>();
        assert_eq!(
            bar_colors,
            vec![WHITE, WHITE, DIM_WHITE, DIM_WHITE, DIM_WHITE]
        );
        assert_eq!(fills[5].1, BATTERY_LOW);
        assert_eq!(fills[5].0.width, 6.0);
        assert_eq!(fills[6].1, WHITE);

        let calls = paint(&RenderRequest {
            battery_percentage: 15,
            ..RenderRequest::default()
        });
        assert!(calls.iter().any(
            |call| matches!(call, DrawCall::Rect { color, .. } if *color == BATTERY_OK)
        ));
    }

    #[test]
    fn message_lines_step_down_by_line_height() {
        let request = RenderRequest {
            message_text: "The quick brown fox jumps over the lazy dog repeatedly to test wrapping behavior across multiple lines".to_owned(),
            ..RenderRequest::default()
        };
        let calls = paint(&request);
        let lines = calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { font, x, y, .. } if *font == MESSAGE_FONT => Some((*x, *y)),
                _ => None,
            })
            .collect::<Vec<_>>();

        // 102 chars plus trailing space at 10 units each cannot fit in 904.
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (60.0, 260.0));
        assert_eq!(lines[1], (60.0, 306.0));
    }

    #[test]
    fn text_failure_aborts_painting() {
        let mut canvas = RecordingCanvas::failing_text();
        let result = paint_card(&mut canvas, &RenderRequest::default());

        assert!(result.is_err());
        assert_eq!(canvas.into_calls().len(), 1);
    }
}
