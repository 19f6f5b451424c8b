/// Default TOML config content with comments.
pub(super) fn default_config_toml() -> &'static str {
    r##"# WebUI Configuration
# Only override what you want to change -- missing fields use defaults.

[window]
# title = "WebUI"
# width = 640            # > 0
# height = 480           # > 0
# min_width = 0          # 0 = unconstrained
# min_height = 0
# border = "sizable"     # sizable, dialog, none
# fullscreen = false
# background = "#ffffff" # #rrggbb or #rrggbbaa

[content]
# url = ""               # leave url and html empty for the placeholder page
# html = ""

[engine]
# debug = false
# eval_timeout_ms = 0    # 0 = wait forever

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
}
