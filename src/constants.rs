//! Version-pinned identifiers of the Maximo UI.
//!
//! The legacy UI offers no automation API, so these generated ids, marker
//! classes and image-asset names are effectively a private wire protocol
//! between the engine and the application. They are pinned to the deployed
//! Maximo build and must not be rediscovered heuristically.

// --- Readiness ------------------------------------------------------------

/// Global busy overlay. Present in the DOM at all times, visible while an
/// AJAX round-trip is in flight.
pub const BUSY_INDICATOR_ID: &str = "wait";

/// Modal wait layer shown for "long operation" server calls.
pub const LONGOP_DIALOG_ID: &str = "query_longopwait-dialog_inner_dialogwait";

/// Single-shot readiness probe: Maximo's own `waitOn` flag plus the
/// long-operation message node.
pub const READY_PROBE_SCRIPT: &str =
    "return waitOn == false && !document.getElementById('m935819a1-longop_message');";

// --- Dialogs --------------------------------------------------------------

/// Every dialog container, foreground or not.
pub const DIALOG_INNER_CSS: &str = "[id$='-dialog_inner']";

/// Suffix of the per-dialog wait layer, `{dialog_id}_dialogwait`.
pub const DIALOG_WAIT_SUFFIX: &str = "_dialogwait";

/// Present only on the wait layer of the dialog that is actually modal.
pub const FOREGROUND_MARKER_CLASS: &str = "wait_modal";

pub const DIALOG_TITLE_CSS: &str = "[id$='-dialog_content0']";
pub const DIALOG_BODY_CSS: &str = "[id$='-dialog_content1']";
pub const DIALOG_BODY_TEXT_CSS: &str = "[id*='_bodydiv']";
pub const DIALOG_BUTTONS_CSS: &str = "button.pb[type='button'][ctype='pushbutton']";

/// Message-box dialogs carry this id prefix on their inner container.
pub const MSGBOX_ID_PREFIX: &str = "msgbox";
pub const MSGBOX_INNER_ID: &str = "msgbox-dialog_inner";
pub const MSGBOX_TEXT_ID: &str = "mb_msg";
pub const MSGBOX_OK_BUTTON_ID: &str = "m88dbf6ce-pb";

// --- Named fields ---------------------------------------------------------

/// Field labels carry exactly the two classes `text label`.
pub const LABEL_MARKER_CSS: &str = "label.text.label";

/// Read-only inputs carry this class until the server enables them.
pub const READONLY_CLASS: &str = "fld_ro";

// --- GoTo menu / sections -------------------------------------------------

pub const GOTO_BUTTON_ID: &str = "titlebar-tb_gotoButton";

/// First entry of the expanded flyout; its presence means the submenu
/// markup has been rendered.
pub const GOTO_MENU_READY_CSS: &str = "#menu0_changeapp_startcntr_a";

/// Top-level (non-submenu) section anchors of the flyout.
pub const SECTION_ANCHORS_CSS: &str = "#menu0 li:not(.submenu) > a";

/// Decoration Maximo appends to section names, stripped during key
/// normalization.
pub const SECTION_NOISE_MARKER: &str = "(MP)";

// --- List view: filters and table ----------------------------------------

pub const LIST_HEADER_ROW_ID: &str = "m6a7dfd2f_tbod_ttrow-tr";
pub const HEADER_LABELS_CSS: &str = "#m6a7dfd2f_tbod_ttrow-tr th > [id$='_ttitle-lb']";

pub const FILTER_TOGGLE_IMG_ID: &str = "m6a7dfd2f-ti_img";
pub const FILTER_OFF_ASSET: &str = "tablebtn_filter_off.gif";
pub const FILTER_OPEN_LINK_ID: &str = "m6a7dfd2f-lb2";
pub const SEARCH_BUTTON_ID: &str = "m6a7dfd2f-ti2_img";

/// Progress dialog button shown for long-running searches.
pub const LONG_SEARCH_BUTTON_ID: &str = "m4b77cc6f-pb";

pub const PAGE_COUNTER_ID: &str = "m6a7dfd2f-lb3";
pub const TABLE_ROWS_CSS: &str = "#m6a7dfd2f_tbod-tbd tr.tablerow[id*='tbod_tdrow-tr[R:']";
pub const NEXT_PAGE_IMG_ID: &str = "m6a7dfd2f-ti7_img";
pub const NEXT_PAGE_ON_ASSET: &str = "tablebtn_next_on.gif";

/// Single DOM walk extracting every visible data row at once. Column names
/// are resolved in-page by matching cell indexes against the header row;
/// the Rust side re-parses cell ids for ordinal bookkeeping.
pub const BATCH_ROWS_SCRIPT: &str = r##"
return (function () {
    var headers = Array.prototype.reduce.call(
        document.querySelectorAll("#m6a7dfd2f_tbod_ttrow-tr th"),
        function (accum, cell) {
            var text = cell.innerText.trim();
            if (text) accum.push({ index: cell.cellIndex, text: text });
            return accum;
        },
        []
    );

    var rows = [];
    document
        .querySelectorAll("#m6a7dfd2f_tbod-tbd tr.tablerow[id*='tbod_tdrow-tr[R:']")
        .forEach(function (row) {
            var cells = Array.prototype.map.call(
                row.querySelectorAll("td"),
                function (cell) {
                    var header = headers.find(function (h) {
                        return h.index === cell.cellIndex;
                    });
                    return {
                        id: cell.id,
                        name: header ? header.text : "",
                        text: cell.innerText.trim(),
                    };
                }
            );
            rows.push({ element_id: row.id, cells: cells });
        });
    return rows;
})();
"##;

// --- Session bootstrap / teardown ----------------------------------------

pub const USERNAME_INPUT_ID: &str = "j_username";
pub const PASSWORD_INPUT_ID: &str = "j_password";
pub const LOGIN_BUTTON_CSS: &str = "button#loginbutton";
pub const SIGNOUT_LINK_ID: &str = "titlebar_hyperlink_9-lbsignout";
pub const LOGIN_FAILURE_TITLE_CSS: &str = "div.dialog[role='main'] > .message";
pub const LOGIN_FAILURE_BODY_CSS: &str = "div.dialog[role='main'] > .messageDesc";

/// Maximo exposes the logout URL as a page-global constant.
pub const LOGOUT_SCRIPT: &str = "window.location = LOGOUTURL";
pub const LOGOUT_CONFIRM_CSS: &str = "#returnFrm > button#submit";

// --- Quick search and record detail ---------------------------------------

pub const QUICKSEARCH_INPUT_ID: &str = "quicksearch";
pub const QUICKSEARCH_BUTTON_ID: &str = "quicksearchQSImage";
pub const RECORD_TABS_ID: &str = "m397b0593-tabs_middle";

/// Drop-down arrow next to the quick-search box.
pub const QUICKSEARCH_MENU_ID: &str = "quicksearchQSMenuImage";

/// "More Search Fields" entry of the quick-search menu. The menu markup is
/// generated on demand, so the entry must be awaited after opening.
pub const SEARCH_MORE_OPTION_ID: &str = "menu0_SEARCHMORE_OPTION_a";

/// Find button of the advanced-search form.
pub const ADVANCED_SEARCH_SUBMIT_ID: &str = "maa8a5ebf-pb";

// --- Workflow -------------------------------------------------------------

pub const ROUTE_WF_TOOLBAR_ID: &str = "ROUTEWF__-tbb_anchor";
pub const CHANGE_STATUS_LINK: &str = "Change Status/Group/Owner (MP)";
pub const CHANGE_STATUS_XPATH: &str =
    "//span[contains(text(), 'Change Status/Group/Owner (MP)')]/parent::a";
pub const STATUS_DIALOG_CLOSE_ID: &str = "mbdb65f6b-pb";
pub const STATUS_DIALOG_ROUTE_ID: &str = "m24bf0ed1-pb";
pub const COMPLETE_ASSIGNMENT_TITLE: &str = "Complete Workflow Assignment";

/// Close button of the scheduled-date message box, which has no OK button.
pub const SCHEDULED_DATE_CLOSE_ID: &str = "m15f1c9f0-pb";
