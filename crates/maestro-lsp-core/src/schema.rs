//! Static schema of the flow format: configuration keys, commands, their
//! properties and the value domains of enumerated properties.
//!
//! The tables are plain data. Completion looks things up here instead of
//! matching on names.

use once_cell::sync::Lazy;
use serde::Serialize;

/// A named property with a short description
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    pub name: &'static str,
    pub description: &'static str,
}

/// A flow command and the properties it accepts beyond the common ones
#[derive(Clone, Debug, Serialize)]
pub struct CommandSchema {
    pub name: &'static str,
    pub description: &'static str,
    /// Whether the command targets a UI element through selector properties
    pub uses_selector: bool,
    pub properties: Vec<PropertySchema>,
}

/// Fixed set of values accepted by some keys
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueDomain {
    pub keys: &'static [&'static str],
    pub values: &'static [&'static str],
}

/// The full schema, built once per process
#[derive(Debug)]
pub struct Schema {
    pub config_keys: Vec<PropertySchema>,
    pub commands: Vec<CommandSchema>,
    pub common_properties: Vec<PropertySchema>,
    pub selector_properties: Vec<PropertySchema>,
    pub value_domains: Vec<ValueDomain>,
}

static SCHEMA: Lazy<Schema> = Lazy::new(Schema::build);

/// The process-wide schema
pub fn schema() -> &'static Schema {
    &SCHEMA
}

impl Schema {
    pub fn command(&self, name: &str) -> Option<&CommandSchema> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn value_domain(&self, key: &str) -> Option<&ValueDomain> {
        self.value_domains
            .iter()
            .find(|d| d.keys.iter().any(|k| *k == key))
    }

    fn build() -> Self {
        let commands = COMMANDS
            .iter()
            .map(|&(name, description)| CommandSchema {
                name,
                description,
                uses_selector: SELECTOR_COMMANDS.contains(&name),
                properties: merge_groups(command_properties(name)),
            })
            .collect();

        Self {
            config_keys: CONFIG_KEYS.iter().map(|&p| property(p)).collect(),
            commands,
            common_properties: COMMON_PROPERTIES.iter().map(|&p| property(p)).collect(),
            selector_properties: SELECTOR_PROPERTIES.iter().map(|&p| property(p)).collect(),
            value_domains: VALUE_DOMAINS.to_vec(),
        }
    }
}

fn property((name, description): (&'static str, &'static str)) -> PropertySchema {
    PropertySchema { name, description }
}

type Table = &'static [(&'static str, &'static str)];

/// Concatenate property groups; a later group's entry replaces the
/// description of an earlier one with the same name, keeping its position
fn merge_groups(groups: &[Table]) -> Vec<PropertySchema> {
    let mut merged: Vec<PropertySchema> = Vec::new();
    for &entry in groups.iter().flat_map(|group| group.iter()) {
        let entry = property(entry);
        match merged.iter_mut().find(|p| p.name == entry.name) {
            Some(existing) => existing.description = entry.description,
            None => merged.push(entry),
        }
    }
    merged
}

/// Command-specific property groups, in suggestion order
fn command_properties(command: &str) -> &'static [Table] {
    match command {
        "launchApp" => &[LAUNCH_APP],
        "tapOn" | "longPressOn" => &[TAP_ON],
        "doubleTapOn" => &[TAP_ON, DOUBLE_TAP_ON],
        "repeat" => &[REPEAT],
        "retry" => &[RETRY],
        "runFlow" => &[RUN_FLOW],
        "runScript" => &[RUN_SCRIPT],
        "extendedWaitUntil" => &[EXTENDED_WAIT_UNTIL],
        "scrollUntilVisible" => &[SCROLL_UNTIL_VISIBLE],
        "swipe" => &[SWIPE],
        "scroll" => &[SCROLL],
        "setLocation" => &[SET_LOCATION],
        "startRecording" | "stopRecording" => &[RECORDING],
        "extractTextWithAI" => &[EXTRACT_TEXT_WITH_AI],
        "assertWithAI" => &[ASSERT_WITH_AI],
        _ => &[],
    }
}

const CONFIG_KEYS: Table = &[
    ("appId", "Package name (Android) or Bundle ID (iOS)"),
    ("url", "URL for web testing"),
    ("name", "Custom flow name for reporting"),
    ("tags", "List of tags for filtering flows"),
    ("env", "Environment variables"),
    ("jsEngine", "JavaScript engine (graaljs or rhino)"),
    ("androidWebViewHierarchy", "Android WebView inspection mode"),
    ("onFlowStart", "Commands to run before flow starts"),
    ("onFlowComplete", "Commands to run after flow completes"),
];

const COMMANDS: Table = &[
    ("launchApp", "Launch the application"),
    ("stopApp", "Stop the application"),
    ("killApp", "Kill the app process"),
    ("clearState", "Clear application state"),
    ("clearKeychain", "Clear iOS keychain data"),
    ("tapOn", "Tap on an element"),
    ("doubleTapOn", "Double tap on an element"),
    ("longPressOn", "Long press on an element"),
    ("assertVisible", "Assert that an element is visible"),
    ("assertNotVisible", "Assert that an element is not visible"),
    ("assertTrue", "Assert that a JavaScript condition is true"),
    ("assertWithAI", "Use AI to assert UI state"),
    ("assertNoDefectsWithAI", "Use AI to detect visual defects"),
    ("inputText", "Input text into a field"),
    ("eraseText", "Erase text from input field"),
    ("copyTextFrom", "Copy text from an element"),
    ("pasteText", "Paste previously copied text"),
    ("pressKey", "Press a keyboard key"),
    ("hideKeyboard", "Hide the on-screen keyboard"),
    ("swipe", "Perform a swipe gesture"),
    ("scroll", "Scroll the view"),
    ("scrollUntilVisible", "Scroll until an element becomes visible"),
    ("back", "Navigate back"),
    ("openLink", "Open a URL or deep link"),
    ("runFlow", "Run another flow file"),
    ("runScript", "Run a JavaScript file"),
    ("repeat", "Repeat commands multiple times"),
    ("retry", "Retry commands on failure"),
    ("extendedWaitUntil", "Wait for a condition"),
    ("waitForAnimationToEnd", "Wait for animations to complete"),
    ("evalScript", "Execute inline JavaScript"),
    ("extractTextWithAI", "Extract text using AI"),
    ("startRecording", "Start screen recording"),
    ("stopRecording", "Stop screen recording"),
    ("takeScreenshot", "Take a screenshot"),
    ("setLocation", "Set mock geolocation"),
    ("setOrientation", "Set device screen orientation"),
    ("setAirplaneMode", "Set airplane mode"),
    ("toggleAirplaneMode", "Toggle airplane mode"),
    ("addMedia", "Add media files to the device"),
    ("travel", "Navigate to a specific point on screen"),
];

const SELECTOR_COMMANDS: &[&str] = &[
    "tapOn",
    "doubleTapOn",
    "longPressOn",
    "assertVisible",
    "assertNotVisible",
    "copyTextFrom",
];

const COMMON_PROPERTIES: Table = &[
    ("label", "Custom name in test output"),
    ("optional", "Don't fail flow if command fails"),
];

const SELECTOR_PROPERTIES: Table = &[
    ("text", "Text content of the element (supports regex)"),
    ("id", "Resource ID (Android) or accessibility ID (iOS) (supports regex)"),
    ("enabled", "Whether the element is enabled"),
    ("checked", "Whether the element is checked"),
    ("focused", "Whether the element is focused"),
    ("selected", "Whether the element is selected"),
    ("index", "0-based index to select among multiple matching elements"),
    ("point", "Tap at relative position (50%,50%) or absolute coordinates (100,200)"),
    ("width", "Element width in pixels"),
    ("height", "Element height in pixels"),
    ("tolerance", "Tolerance for width/height comparison"),
    ("below", "Element below another element with given selector"),
    ("above", "Element above another element with given selector"),
    ("leftOf", "Element to the left of another element"),
    ("rightOf", "Element to the right of another element"),
    ("containsChild", "Element containing a direct child with given selector"),
    ("childOf", "Element that is a child of another element"),
    ("containsDescendants", "Element containing all specified descendant elements"),
];

const LAUNCH_APP: Table = &[
    ("appId", "Package name (Android) or Bundle ID (iOS)"),
    ("clearState", "Clear app state before launch"),
    ("clearKeychain", "Clear iOS keychain before launch"),
    ("stopApp", "Stop app before launching"),
    ("permissions", "Configure app permissions"),
    ("arguments", "Launch arguments to pass to app"),
];

const TAP_ON: Table = &[
    ("retryTapIfNoChange", "Retry tap if UI doesn't change"),
    ("waitToSettleTimeoutMs", "Time in milliseconds to wait for UI to settle after tap"),
    ("repeat", "Number of times to repeat the tap"),
    ("delay", "Delay in milliseconds between repeated taps"),
];

const DOUBLE_TAP_ON: Table = &[(
    "delay",
    "Delay in milliseconds between the two taps (default: 100ms)",
)];

const REPEAT: Table = &[
    ("times", "Number of times to repeat"),
    ("while", "Condition to repeat while true"),
    ("commands", "Commands to repeat"),
];

const RETRY: Table = &[
    ("maxRetries", "Maximum number of retry attempts"),
    ("commands", "Commands to retry"),
    ("file", "Flow file to retry"),
];

const RUN_FLOW: Table = &[
    ("file", "Path to flow file"),
    ("env", "Environment variables to pass"),
    ("commands", "Inline commands to execute"),
    ("when", "Condition for execution"),
];

const RUN_SCRIPT: Table = &[
    ("file", "Path to JavaScript file"),
    ("env", "Environment variables to pass"),
    ("when", "Condition for execution"),
];

const EXTENDED_WAIT_UNTIL: Table = &[
    ("visible", "Wait until element is visible"),
    ("notVisible", "Wait until element is not visible"),
    ("timeout", "Timeout in milliseconds"),
];

const SCROLL_UNTIL_VISIBLE: Table = &[
    ("element", "Element to scroll to"),
    ("direction", "Scroll direction (UP, DOWN, LEFT, RIGHT)"),
    ("timeout", "Timeout in milliseconds"),
    ("speed", "Scroll speed (0-100)"),
    ("visibilityPercentage", "Required visibility percentage (0-100)"),
    ("centerElement", "Center element in viewport"),
];

const SWIPE: Table = &[
    ("direction", "Swipe direction (UP, DOWN, LEFT, RIGHT)"),
    ("start", "Start coordinates (e.g., 50%,50% or 100,200)"),
    ("end", "End coordinates (e.g., 10%,50% or 50,300)"),
    ("from", "Element to swipe from (any selector)"),
];

const SCROLL: Table = &[("direction", "Scroll direction (UP, DOWN, LEFT, RIGHT)")];

const SET_LOCATION: Table = &[
    ("latitude", "Latitude coordinate"),
    ("longitude", "Longitude coordinate"),
];

const RECORDING: Table = &[("path", "Recording file path")];

const EXTRACT_TEXT_WITH_AI: Table = &[
    ("query", "Text extraction query"),
    ("outputVariable", "Variable name for extracted text"),
];

const ASSERT_WITH_AI: Table = &[("assertion", "AI assertion description")];

const VALUE_DOMAINS: &[ValueDomain] = &[
    ValueDomain {
        keys: &["direction"],
        values: &["UP", "DOWN", "LEFT", "RIGHT"],
    },
    ValueDomain {
        keys: &["setOrientation"],
        values: &["portrait", "landscape"],
    },
    ValueDomain {
        keys: &["jsEngine"],
        values: &["graaljs", "rhino"],
    },
    ValueDomain {
        keys: &["pressKey"],
        values: &[
            "Enter", "Backspace", "Delete", "Escape", "Tab", "Space", "Home", "End", "PageUp",
            "PageDown", "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight",
        ],
    },
    ValueDomain {
        keys: &[
            "enabled",
            "checked",
            "focused",
            "selected",
            "clearState",
            "clearKeychain",
            "stopApp",
            "optional",
            "retryTapIfNoChange",
            "centerElement",
        ],
        values: &["true", "false"],
    },
    ValueDomain {
        keys: &["all", "camera", "location", "notifications", "medialibrary"],
        values: &["allow", "deny", "unset"],
    },
];
