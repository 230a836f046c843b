pub mod core {
    pub mod database_type;
    pub mod value;
}

pub mod pagination {
    pub mod window;
}

pub mod statement {
    pub mod aggregation;
    pub mod context;
    pub mod order_by;
}
