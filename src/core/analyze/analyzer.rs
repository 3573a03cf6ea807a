//! Page structure analysis
//!
//! Runs an in-page collector script through the driver and deserializes
//! the result into a [`PageStructure`]. Analysis must never fail a run:
//! a page the collector cannot read yields an empty snapshot with a
//! warning, and absent element classes simply come back as empty lists.

use super::structure::PageStructure;
use crate::adapters::browser::PortalDriver;
use crate::domain::Result;

/// In-page collector producing the structural snapshot as a JSON string.
///
/// Purely descriptive: it records what is on the page, not what it means.
/// Row capture is capped so a pathological table can't blow up the
/// payload; `row_count` still reports the real size.
pub const STRUCTURE_SCRIPT: &str = r#"
(function () {
    var MAX_ROWS = 200;

    function text(el) {
        return (el.textContent || '').replace(/\s+/g, ' ').trim();
    }

    function selectorFor(el) {
        if (el.id) return '#' + el.id;
        if (el.name) return el.tagName.toLowerCase() + '[name="' + el.name + '"]';
        return el.tagName.toLowerCase();
    }

    function labelFor(el) {
        if (el.id) {
            var lab = document.querySelector('label[for="' + el.id + '"]');
            if (lab) return text(lab);
        }
        var wrapper = el.closest('label');
        if (wrapper) return text(wrapper);
        if (el.placeholder) return el.placeholder;
        var cell = el.closest('td');
        if (cell && cell.previousElementSibling) return text(cell.previousElementSibling);
        return null;
    }

    var forms = Array.from(document.forms).map(function (form) {
        return {
            name: form.getAttribute('name'),
            id: form.id || null,
            action: form.getAttribute('action'),
            method: form.getAttribute('method'),
            fields: Array.from(form.elements)
                .filter(function (el) {
                    return ['INPUT', 'SELECT', 'TEXTAREA'].indexOf(el.tagName) >= 0
                        && el.type !== 'hidden';
                })
                .map(function (el) {
                    return {
                        name: el.name || null,
                        id: el.id || null,
                        selector: selectorFor(el),
                        field_type: el.tagName === 'SELECT' ? 'select'
                            : (el.type || el.tagName.toLowerCase()),
                        label: labelFor(el),
                        required: !!el.required,
                        options: el.tagName === 'SELECT'
                            ? Array.from(el.options).map(function (o) { return text(o); })
                            : []
                    };
                })
        };
    });

    var buttons = Array.from(
        document.querySelectorAll('button, input[type=submit], input[type=button]')
    ).map(function (el) {
        return {
            text: el.tagName === 'INPUT' ? (el.value || '') : text(el),
            selector: selectorFor(el),
            button_type: el.type || null
        };
    });

    var links = Array.from(document.querySelectorAll('a[href]')).map(function (el) {
        return { text: text(el), href: el.getAttribute('href') };
    }).filter(function (l) { return l.text.length > 0; });

    var menuItems = Array.from(
        document.querySelectorAll('nav li, ul.menu li, [role=menuitem]')
    ).map(function (el) {
        var link = el.querySelector('a[href]');
        return { text: text(el), href: link ? link.getAttribute('href') : null };
    }).filter(function (m) { return m.text.length > 0; });

    var tables = Array.from(document.querySelectorAll('table')).map(function (table) {
        var headerCells = table.querySelectorAll('thead th');
        if (headerCells.length === 0) {
            var firstRow = table.querySelector('tr');
            headerCells = firstRow ? firstRow.querySelectorAll('th, td') : [];
        }
        var headers = Array.from(headerCells).map(text);
        var bodyRows = Array.from(table.querySelectorAll('tbody tr'));
        if (bodyRows.length === 0) {
            bodyRows = Array.from(table.querySelectorAll('tr')).slice(headers.length ? 1 : 0);
        }
        return {
            headers: headers,
            rows: bodyRows.slice(0, MAX_ROWS).map(function (tr) {
                return Array.from(tr.querySelectorAll('td, th')).map(text);
            }),
            row_count: bodyRows.length
        };
    });

    var labeledValues = [];
    Array.from(document.querySelectorAll('th')).forEach(function (th) {
        var next = th.nextElementSibling;
        if (next && next.tagName === 'TD') {
            labeledValues.push({ label: text(th), value: text(next) });
        }
    });
    Array.from(document.querySelectorAll('dt')).forEach(function (dt) {
        var next = dt.nextElementSibling;
        if (next && next.tagName === 'DD') {
            labeledValues.push({ label: text(dt), value: text(next) });
        }
    });
    Array.from(document.querySelectorAll('label')).forEach(function (lab) {
        var next = lab.nextElementSibling;
        if (next && ['SPAN', 'DIV', 'P'].indexOf(next.tagName) >= 0) {
            labeledValues.push({ label: text(lab), value: text(next) });
        }
    });

    return JSON.stringify({
        url: location.href,
        title: document.title,
        forms: forms,
        buttons: buttons,
        links: links,
        menu_items: menuItems,
        tables: tables,
        labeled_values: labeledValues
    });
})()
"#;

/// Captures a structural snapshot of the page the driver is on.
///
/// Collection failures are logged and produce an empty snapshot; they are
/// never allowed to fail the caller.
pub async fn analyze(driver: &dyn PortalDriver) -> Result<PageStructure> {
    let url = driver.current_url().await.unwrap_or_default();

    match driver.evaluate_json(STRUCTURE_SCRIPT).await {
        Ok(value) => match serde_json::from_value::<PageStructure>(value) {
            Ok(structure) => {
                tracing::debug!(
                    url = %structure.url,
                    forms = structure.forms.len(),
                    links = structure.links.len(),
                    tables = structure.tables.len(),
                    "Page structure captured"
                );
                Ok(structure)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Collector payload unreadable");
                Ok(PageStructure::empty(url))
            }
        },
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Structure collection failed");
            Ok(PageStructure::empty(url))
        }
    }
}

/// Renders a snapshot as markdown, used by the `inspect` command to
/// document the portal's page structure.
pub fn to_markdown(structure: &PageStructure) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Page: {}\n\n", structure.title));
    out.push_str(&format!("URL: `{}`\n\n", structure.url));

    if !structure.forms.is_empty() {
        out.push_str("## Forms\n\n");
        for (i, form) in structure.forms.iter().enumerate() {
            let name = form
                .name
                .as_deref()
                .or(form.id.as_deref())
                .unwrap_or("(unnamed)");
            out.push_str(&format!("### Form {}: {}\n\n", i + 1, name));
            out.push_str("| Field | Type | Label | Required |\n");
            out.push_str("|---|---|---|---|\n");
            for field in &form.fields {
                out.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    field.name.as_deref().unwrap_or("-"),
                    field.field_type,
                    field.label.as_deref().unwrap_or("-"),
                    if field.required { "yes" } else { "no" },
                ));
            }
            out.push('\n');
        }
    }

    if !structure.buttons.is_empty() {
        out.push_str("## Buttons\n\n");
        for button in &structure.buttons {
            out.push_str(&format!("- {}\n", button.text));
        }
        out.push('\n');
    }

    if !structure.links.is_empty() {
        out.push_str("## Links\n\n");
        for link in &structure.links {
            out.push_str(&format!(
                "- [{}]({})\n",
                link.text,
                link.href.as_deref().unwrap_or("#")
            ));
        }
        out.push('\n');
    }

    if !structure.tables.is_empty() {
        out.push_str("## Tables\n\n");
        for (i, table) in structure.tables.iter().enumerate() {
            out.push_str(&format!(
                "- Table {}: {} rows, headers: {}\n",
                i + 1,
                table.row_count,
                table.headers.join(" | ")
            ));
        }
        out.push('\n');
    }

    out
}
