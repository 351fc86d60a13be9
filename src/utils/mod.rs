// Utilities shared by the index builder, the resolver and the import manager

pub mod ignore;
pub mod paths;
