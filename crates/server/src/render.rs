use shared::{
    domain::{Control, ControlKind},
    protocol::activate_route,
};

const CONTROLS_SLOT: &str = "{{controls}}";
const ROUTE_SLOT: &str = "{{activate_route}}";

/// Built-in page. An operator template uses the same two slots.
const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Control Panel</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <main class="panel">
{{controls}}    </main>
    <div id="toast" class="toast" hidden></div>
    <script>
        const toast = document.getElementById('toast');
        function report(message, ok) {
            toast.textContent = message;
            toast.className = ok ? 'toast ok' : 'toast error';
            toast.hidden = false;
            clearTimeout(report.timer);
            report.timer = setTimeout(() => { toast.hidden = true; }, 2500);
        }
        async function activate(name, value) {
            try {
                const response = await fetch('{{activate_route}}', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ name: name, value: String(value) }),
                });
                if (response.ok) {
                    report(name + ': ok', true);
                } else {
                    const text = await response.text();
                    report(name + ': ' + text, false);
                }
            } catch (err) {
                report(name + ': ' + err, false);
            }
        }
        document.querySelectorAll('button[data-name]').forEach((button) => {
            button.addEventListener('click', () => activate(button.dataset.name, ''));
        });
        document.querySelectorAll('input[type=range][data-name]').forEach((slider) => {
            const output = slider.parentElement.querySelector('output');
            slider.addEventListener('input', () => { output.textContent = slider.value; });
            slider.addEventListener('change', () => activate(slider.dataset.name, slider.value));
        });
    </script>
</body>
</html>
"#;

/// Renders the whole panel page for `controls`, in order.
pub fn render_page(controls: &[Control]) -> String {
    render_with_template(DEFAULT_TEMPLATE, controls)
}

/// Fills `{{controls}}` with the control markup and `{{activate_route}}` with
/// the activation path. Text outside the slots is copied unchanged.
pub fn render_with_template(template: &str, controls: &[Control]) -> String {
    let mut markup = String::new();
    if controls.is_empty() {
        markup.push_str("        <p class=\"empty\">No controls configured.</p>\n");
    }
    for control in controls {
        markup.push_str(&render_control(control));
    }
    template
        .replace(ROUTE_SLOT, activate_route())
        .replace(CONTROLS_SLOT, &markup)
}

fn render_control(control: &Control) -> String {
    let name = escape_html(&control.name);
    let icon = escape_html(&control.icon);
    match control.kind {
        ControlKind::Button => format!(
            r#"        <div class="control button"><button type="button" data-name="{name}"><span class="icon">{icon}</span><span class="label">{name}</span></button></div>
"#
        ),
        ControlKind::Slider => format!(
            r#"        <div class="control slider"><label><span class="icon">{icon}</span><span class="label">{name}</span><input type="range" data-name="{name}" min="{min}" max="{max}" value="{value}"><output>{value}</output></label></div>
"#,
            min = control.min,
            max = control.max,
            value = control.value,
        ),
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
