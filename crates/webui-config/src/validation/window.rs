use crate::schema::WebUiSettings;
use webui_common::Color;

pub(super) fn validate_window(errors: &mut Vec<String>, settings: &WebUiSettings) {
    let window = &settings.window;

    if window.width == 0 {
        errors.push("window.width must be greater than 0".into());
    }
    if window.height == 0 {
        errors.push("window.height must be greater than 0".into());
    }

    let min = settings.min_size();
    if !min.is_unset() && !min.fits_within(settings.size()) {
        errors.push(format!(
            "window minimum size {}x{} exceeds window size {}x{}",
            min.width, min.height, window.width, window.height
        ));
    }

    if let Some(bg) = &window.background {
        if Color::from_hex(bg).is_none() {
            errors.push(format!(
                "window.background = {bg:?} is not a #rrggbb or #rrggbbaa color"
            ));
        }
    }
}
