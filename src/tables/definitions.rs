//! Built-in HubSpot tables

use super::column::{Column, ColumnSource};
use super::table::{Table, TableKind};
use crate::types::{object_type, ColumnType};

/// Object types each CRM table exposes associations to
pub fn associated_types(object: &str) -> &'static [&'static str] {
    match object {
        object_type::COMPANY => &[object_type::CONTACT, object_type::DEAL, object_type::TICKET],
        object_type::CONTACT => &[object_type::COMPANY, object_type::DEAL, object_type::TICKET],
        object_type::DEAL => &[object_type::COMPANY, object_type::CONTACT, object_type::TICKET],
        object_type::TICKET => &[object_type::COMPANY, object_type::CONTACT, object_type::DEAL],
        _ => &[],
    }
}

/// Object types whose properties are discovered
pub const CRM_OBJECT_TYPES: [&str; 4] = [
    object_type::COMPANY,
    object_type::CONTACT,
    object_type::DEAL,
    object_type::TICKET,
];

/// Every built-in table, without dynamic property columns
pub fn builtin_tables() -> Vec<Table> {
    vec![company(), contact(), deal(), ticket(), owner()]
}

/// Fixed definition of the table for `object`, if there is one
pub fn builtin_table(object: &str) -> Option<Table> {
    builtin_tables()
        .into_iter()
        .find(|table| table.object_type == object)
}

fn company() -> Table {
    crm_table(
        object_type::COMPANY,
        "List of HubSpot Companies.",
        vec![
            Column::property(
                "domain",
                "domain",
                ColumnType::String,
                "The domain associated with the company.",
            ),
            Column::property("name", "name", ColumnType::String, "The name of the company."),
        ],
        ColumnSource::Property("name".to_string()),
    )
}

fn contact() -> Table {
    crm_table(
        object_type::CONTACT,
        "List of HubSpot Contacts.",
        vec![
            Column::property(
                "email",
                "email",
                ColumnType::String,
                "The email address of the contact.",
            ),
            Column::property(
                "first_name",
                "firstname",
                ColumnType::String,
                "The first name of the contact.",
            ),
            Column::property(
                "last_name",
                "lastname",
                ColumnType::String,
                "The last name of the contact.",
            ),
        ],
        ColumnSource::Id,
    )
}

fn deal() -> Table {
    crm_table(
        object_type::DEAL,
        "List of HubSpot Deals.",
        vec![
            Column::property("amount", "amount", ColumnType::String, "The amount of the deal."),
            Column::property("deal_name", "dealname", ColumnType::String, "The name of the deal."),
            Column::property(
                "pipeline",
                "pipeline",
                ColumnType::String,
                "The pipeline the deal is in.",
            ),
            Column::property(
                "close_date",
                "closedate",
                ColumnType::Timestamp,
                "The expected close date of the deal.",
            ),
            Column::property(
                "deal_stage",
                "dealstage",
                ColumnType::String,
                "The stage of the deal.",
            ),
        ],
        ColumnSource::Property("dealname".to_string()),
    )
}

fn ticket() -> Table {
    crm_table(
        object_type::TICKET,
        "List of HubSpot Tickets.",
        vec![
            Column::property(
                "content",
                "content",
                ColumnType::String,
                "The content of the ticket.",
            ),
            Column::property(
                "subject",
                "subject",
                ColumnType::String,
                "The subject of the ticket.",
            ),
            Column::property(
                "pipeline",
                "hs_pipeline",
                ColumnType::String,
                "The pipeline the ticket is in.",
            ),
            Column::property(
                "pipeline_stage",
                "hs_pipeline_stage",
                ColumnType::String,
                "The pipeline stage of the ticket.",
            ),
            Column::property(
                "ticket_category",
                "hs_ticket_category",
                ColumnType::String,
                "The category of the ticket.",
            ),
            Column::property(
                "ticket_priority",
                "hs_ticket_priority",
                ColumnType::String,
                "The priority of the ticket.",
            ),
        ],
        ColumnSource::Property("subject".to_string()),
    )
}

fn owner() -> Table {
    let columns = vec![
        portal_id(),
        Column::new("id", ColumnType::String, "The unique ID of the owner.", ColumnSource::Id),
        Column::field(
            "created_at",
            "createdAt",
            ColumnType::Timestamp,
            "The timestamp when the owner was created.",
        ),
        Column::field(
            "updated_at",
            "updatedAt",
            ColumnType::Timestamp,
            "The timestamp when the owner was last updated.",
        ),
        Column::field(
            "archived",
            "archived",
            ColumnType::Bool,
            "Indicates whether the owner is archived or not.",
        ),
        Column::field("email", "email", ColumnType::String, "The email address of the owner."),
        Column::field(
            "first_name",
            "firstName",
            ColumnType::String,
            "The first name of the owner.",
        ),
        Column::field("last_name", "lastName", ColumnType::String, "The last name of the owner."),
        Column::field("user_id", "userId", ColumnType::Int, "The user ID of the owner."),
        Column::field("teams", "teams", ColumnType::Json, "The teams the owner belongs to."),
        Column::new("title", ColumnType::String, "Title of the resource.", ColumnSource::Id),
    ];

    Table::new(
        "hubspot_owner",
        "List of HubSpot Owners.",
        object_type::OWNER,
        TableKind::Owner,
        columns,
    )
}

fn portal_id() -> Column {
    Column::new(
        "portal_id",
        ColumnType::String,
        "Unique identifier for the HubSpot portal or account.",
        ColumnSource::PortalId,
    )
}

/// Common columns, then the table's own, then associations and title
fn crm_table(object: &str, description: &str, own: Vec<Column>, title: ColumnSource) -> Table {
    let mut columns = vec![
        portal_id(),
        Column::new(
            "id",
            ColumnType::String,
            format!("The unique ID of the {object}."),
            ColumnSource::Id,
        ),
        Column::field(
            "created_at",
            "createdAt",
            ColumnType::Timestamp,
            format!("The timestamp when the {object} was created."),
        ),
        Column::field(
            "updated_at",
            "updatedAt",
            ColumnType::Timestamp,
            format!("The timestamp when the {object} was last updated."),
        ),
        Column::field(
            "archived",
            "archived",
            ColumnType::Bool,
            format!("Indicates whether the {object} is archived or not."),
        ),
        Column::field(
            "archived_at",
            "archivedAt",
            ColumnType::Timestamp,
            format!("The timestamp when the {object} was archived."),
        ),
    ];
    columns.extend(own);
    columns.push(Column::new(
        "properties",
        ColumnType::Json,
        format!("The properties associated with the {object}."),
        ColumnSource::Properties,
    ));
    columns.push(Column::new(
        "properties_with_history",
        ColumnType::Json,
        format!("The properties associated with the {object} including historical changes."),
        ColumnSource::PropertiesWithHistory,
    ));

    for target in associated_types(object) {
        columns.push(Column::new(
            format!("associations_with_{}", plural(target)),
            ColumnType::Json,
            format!("The associations of the {object} with {}.", plural(target)),
            ColumnSource::Associations((*target).to_string()),
        ));
    }

    columns.push(Column::new("title", ColumnType::String, "Title of the resource.", title));

    Table::new(
        format!("hubspot_{object}"),
        description,
        object,
        TableKind::CrmObject,
        columns,
    )
}

fn plural(object: &str) -> String {
    match object {
        object_type::COMPANY => "companies".to_string(),
        other => format!("{other}s"),
    }
}
