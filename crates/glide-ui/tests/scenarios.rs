use glide_ui::big_number::BigNumberCollection;
use glide_ui::big_number::BigNumberCollectionProps;
use glide_ui::big_number::BigNumberItem;
use glide_ui::card::AspectRatio;
use glide_ui::card::CardCollection;
use glide_ui::card::CardCollectionProps;
use glide_ui::card::CardItem;
use glide_ui::card::CardOptions;
use glide_ui::card::CardSlots;
use glide_ui::card::CardVariant;
use glide_ui::card::ImageShape;
use glide_ui::card::TitleStyle;
use glide_ui::card::card_view;
use glide_ui::data::DynamicRow;
use glide_ui::data::Record;
use glide_ui::data::SortState;
use glide_ui::data::Value;
use glide_ui::data::display_order;
use glide_ui::datagrid::ColumnDefinition;
use glide_ui::datagrid::ColumnType;
use glide_ui::datagrid::DataGrid;
use glide_ui::datagrid::DataGridOptions;
use glide_ui::interaction::Interaction;
use glide_ui::media::Media;
use glide_ui::selection::RowId;
use glide_ui::table::TableCollection;
use glide_ui::table::TableCollectionOptions;
use glide_ui::table::TableColumn;
use glide_ui::tabs::TabItem;
use glide_ui::tabs::TabsAction;
use glide_ui::tabs::TabsContainer;
use glide_ui::tabs::TabsOptions;
use glide_ui::variant::Direction;
use glide_ui::variant::Variant;
use glide_ui::view::ItemView;
use glide_ui::view::Slot;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

#[derive(Clone, Debug, PartialEq)]
struct Row {
    id: u64,
    name: String,
}

impl Record for Row {
    fn values(&self) -> Vec<Value> {
        vec![Value::Int(self.id as i64), self.name.as_str().into()]
    }
}

fn texts(view: &ItemView) -> Vec<String> {
    view.slots
        .iter()
        .flat_map(|slot| match slot {
            Slot::Text(t) => vec![t.text.clone()],
            Slot::Inline(blocks) => blocks.iter().map(|b| b.text.clone()).collect(),
            Slot::View(v) => texts(v),
            _ => Vec::new(),
        })
        .collect()
}

#[test]
fn table_sorted_by_name_lists_a_before_b() {
    let rows = vec![
        Row {
            id: 1,
            name: "B".to_string(),
        },
        Row {
            id: 2,
            name: "A".to_string(),
        },
    ];
    let columns = vec![TableColumn::sortable("name", "Name", |r: &Row| r.name.as_str().into())];
    let mut table = TableCollection::new(
        rows,
        columns,
        TableCollectionOptions {
            enable_sorting: true,
            ..Default::default()
        },
    )
    .with_row_id(|r, _| RowId(r.id));
    assert!(table.sort_by("name"));
    let names: Vec<&str> = table
        .page_rows()
        .iter()
        .map(|&i| table.rows()[i].name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn grid_search_for_oe_keeps_only_john_doe() {
    let rows = vec![
        DynamicRow::new().with("name", "John Doe"),
        DynamicRow::new().with("name", "Jane Smith"),
    ];
    let definitions = [ColumnDefinition::new("name", "Name", ColumnType::Text)];
    let mut grid = DataGrid::from_definitions(
        rows,
        &definitions,
        DataGridOptions {
            enable_search: true,
            ..Default::default()
        },
    );
    grid.set_query("oe");
    let names: Vec<Value> = grid
        .display_order()
        .iter()
        .map(|&i| grid.rows()[i].get("name"))
        .collect();
    assert_eq!(names, vec![Value::from("John Doe")]);
}

#[test]
fn big_number_limit_keeps_first_items_in_order() {
    let items = vec![
        BigNumberItem::new(10).label("One"),
        BigNumberItem::new(20).label("Two"),
        BigNumberItem::new(30).label("Three"),
    ];
    let collection = BigNumberCollection::new(
        items,
        BigNumberCollectionProps {
            limit: Some(2),
            ..Default::default()
        },
    );
    let views = collection.views();
    assert_eq!(views.len(), 2);
    assert!(texts(&views[0]).iter().any(|t| t.contains("10")));
    assert!(texts(&views[1]).iter().any(|t| t.contains("20")));

    let all = BigNumberCollection::new(
        vec![BigNumberItem::new(1)],
        BigNumberCollectionProps {
            limit: Some(5),
            ..Default::default()
        },
    );
    assert_eq!(all.views().len(), 1);
}

#[test]
fn every_card_variant_combination_renders() {
    let item = CardItem::new("Title").description("Body").meta("Meta");
    for variant in CardVariant::ALL {
        for orientation in Direction::ALL {
            for aspect_ratio in AspectRatio::ALL {
                for image_shape in ImageShape::ALL {
                    for title_style in TitleStyle::ALL {
                        let options = CardOptions {
                            variant: *variant,
                            orientation: *orientation,
                            aspect_ratio: *aspect_ratio,
                            image_shape: *image_shape,
                            title_style: *title_style,
                            ..Default::default()
                        };
                        let view = card_view(&item, &options, CardSlots::default());
                        assert!(view.height(40) > 0);
                        let area = Rect::new(0, 0, 40, view.height(40));
                        let mut buf = Buffer::empty(area);
                        view.render(area, &mut buf, &Default::default(), false);
                    }
                }
            }
        }
    }
}

#[test]
fn href_makes_a_link_even_with_a_click_handler() {
    let collection = CardCollection::new(
        vec![
            CardItem::new("Docs").href("/docs"),
            CardItem::new("Plain"),
        ],
        CardCollectionProps {
            card: CardOptions {
                clickable: true,
                ..Default::default()
            },
            ..Default::default()
        },
    );
    assert_eq!(
        collection.views()[0].interaction,
        Interaction::Link {
            href: "/docs".to_string()
        }
    );
    assert_eq!(collection.views()[1].interaction, Interaction::Action);
}

#[test]
fn cards_without_images_show_the_placeholder() {
    let view = card_view(&CardItem::new("No image"), &CardOptions::default(), CardSlots::default());
    assert_eq!(view.media.map(|m| m.media), Some(Media::Placeholder));
}

#[test]
fn pipeline_is_stable_under_repetition() {
    let rows: Vec<DynamicRow> = ["b", "a", "c", "a"]
        .iter()
        .map(|n| DynamicRow::new().with("name", *n))
        .collect();
    let mut sort = SortState::new();
    sort.toggle_two_way("name");
    let first = display_order(&rows, "a", sort.columns(), |r: &DynamicRow, key: &str| r.get(key));
    let second = display_order(&rows, "a", sort.columns(), |r: &DynamicRow, key: &str| r.get(key));
    assert_eq!(first, second);
    assert_eq!(first, vec![1, 3]);
}

#[test]
fn hiding_the_active_tab_falls_back_then_empties() {
    let tabs = vec![TabItem::new("one", "One"), TabItem::new("two", "Two")];
    let mut container =
        TabsContainer::new(tabs.clone(), TabsOptions::default()).default_value("two");
    assert_eq!(container.active(), Some("two"));

    let hidden = vec![tabs[0].clone(), tabs[1].clone().visible(false)];
    assert_eq!(container.set_tabs(hidden), TabsAction::ValueChange("one".to_string()));
    assert_eq!(container.active(), Some("one"));

    let none = tabs.into_iter().map(|t| t.visible(false)).collect();
    container.set_tabs(none);
    assert_eq!(container.active(), None);
}
