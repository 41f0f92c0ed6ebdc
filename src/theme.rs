// Shared inline styles for the overlay widgets.

pub const PANEL: &str = "position:absolute; background:white; z-index:50; border-radius:5px; box-shadow:0px 0px 5px 3px rgba(0,0,0,0.75);";
pub const TOOLTIP: &str = "position:absolute; top:100%; left:50%; transform:translateX(-50%); margin-top:4px; background:white; color:black; font-size:0.8em; padding:2px 6px; border-radius:4px; white-space:nowrap; pointer-events:none; box-shadow:0 1px 3px rgba(0,0,0,0.4);";
pub const ICON_BUTTON: &str = "background:none; border:none; cursor:pointer; font-size:22px; line-height:1; padding:6px;";
pub const HELP_LABEL: &str = "position:absolute; color:red; font-weight:bold; margin:0; white-space:nowrap;";

pub const ACTIVE: &str = "red";
pub const IDLE: &str = "black";

pub fn arrow_color(active: bool) -> &'static str {
    if active { ACTIVE } else { IDLE }
}
