//! Plain-text summary rendered from an embedded template (no external assets).

use minijinja::{context, Environment};

use crate::{ReportError, ReportModel};

static TEMPLATE: &str = r#"{{ cover.title }}
Status: {{ cover.status }}
House: {{ cover.house_size }} seats ({{ cover.constituency_seats }} constituency + {{ cover.list_seats }} party-list); majority {{ cover.majority_threshold }}, simple majority {{ cover.simple_majority_threshold }}

Seats
{% for r in seats.rows %}
  {{ r.party.label }}: {{ r.total_seats }} ({{ r.constituency_seats }} constituency + {{ r.party_list_seats }} list) {{ r.total_pct }}
{% endfor %}
{% if seats.undetermined_districts > 0 %}
  {{ seats.undetermined_label }}: {{ seats.undetermined_districts }} district(s)
{% endif %}
  TOTAL: {{ seats.totals.total_seats }} ({{ seats.totals.constituency_seats }} + {{ seats.totals.party_list_seats }}) {{ seats.totals.total_pct }}

Party list ({{ party_list.seats }} seats, {{ party_list.national_total }} votes{% if party_list.quota %}, quota {{ party_list.quota }}{% endif %})
{% for r in party_list.rows %}
  {{ r.party.label }}: {{ r.total_votes }} votes, {{ r.vote_share }}, {{ r.final_seats }} seat(s){% if r.extra_seat %} (+1 remainder){% endif %}

{% endfor %}
{% if coalition %}

Coalition: {{ coalition.total_seats }} seats, {{ coalition.status_text }}
{% for m in coalition.members %}
  {{ m.party.label }}: {{ m.seats }}
{% endfor %}
{% if coalition.unseated %}
  No seats: {{ coalition.unseated | join(", ") }}
{% endif %}
{% if coalition.short_of_majority > 0 %}
  {{ coalition.short_of_majority }} short of majority
{% endif %}
{% endif %}
{% if data_quality.warnings %}

Warnings
{% for w in data_quality.warnings %}
  {{ w }}
{% endfor %}
{% endif %}

{{ cover.result_id }}
"#;

pub fn render_text(model: &ReportModel) -> Result<String, ReportError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("report.txt", TEMPLATE)
        .map_err(|e| ReportError::Template { stage: "add_template", msg: e.to_string() })?;
    let tmpl = env
        .get_template("report.txt")
        .map_err(|e| ReportError::Template { stage: "get_template", msg: e.to_string() })?;

    let ctx = context! {
        cover => &model.cover,
        seats => &model.seats,
        party_list => &model.party_list,
        coalition => &model.coalition,
        data_quality => &model.data_quality,
    };
    tmpl.render(ctx)
        .map_err(|e| ReportError::Template { stage: "render", msg: e.to_string() })
}
